use crate::errors::AutomationError;
use crate::locator::{
    has_strategy_prefix, valid_examples, window_locator, LocatorExpression, Strategy,
};

#[test]
fn prefixed_locators_parse_to_their_strategy() {
    for strategy in Strategy::ALL {
        let raw = format!("{strategy}:target");
        let parsed = LocatorExpression::parse(&raw).unwrap();
        assert_eq!(parsed.strategy(), strategy);
        assert_eq!(parsed.value(), "target");
        assert_eq!(parsed.to_string(), raw);
    }
}

#[test]
fn bare_string_defaults_to_name_strategy() {
    let parsed = LocatorExpression::parse("OKButton").unwrap();
    assert_eq!(parsed.strategy(), Strategy::Name);
    assert_eq!(parsed.value(), "OKButton");
    assert_eq!(parsed.to_string(), "name:OKButton");
}

#[test]
fn value_keeps_everything_after_the_first_colon() {
    let parsed = LocatorExpression::parse("xpath://div[@id='x']/button[1]").unwrap();
    assert_eq!(parsed.strategy(), Strategy::XPath);
    assert_eq!(parsed.value(), "//div[@id='x']/button[1]");

    let parsed = LocatorExpression::parse("text:Hello: World").unwrap();
    assert_eq!(parsed.value(), "Hello: World");
}

#[test]
fn empty_locator_is_rejected() {
    for raw in ["", "   "] {
        let err = LocatorExpression::parse(raw).unwrap_err();
        assert!(matches!(err, AutomationError::InvalidLocator(_)), "{err}");
    }
}

#[test]
fn unsupported_strategy_is_rejected_with_examples() {
    let err = LocatorExpression::parse("css:.button").unwrap_err();
    match err {
        AutomationError::InvalidLocator(msg) => {
            assert!(msg.contains("css"), "{msg}");
            assert!(msg.contains("name:OKButton"), "{msg}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn format_validates_the_strategy_name() {
    assert_eq!(
        LocatorExpression::format("class", "Edit").unwrap(),
        "class:Edit"
    );
    let err = LocatorExpression::format("tagname", "Edit").unwrap_err();
    assert!(matches!(err, AutomationError::InvalidLocator(_)), "{err}");
}

#[test]
fn strategy_parse_and_as_str_agree() {
    for strategy in Strategy::ALL {
        assert_eq!(Strategy::parse(strategy.as_str()).unwrap(), strategy);
    }
    assert!(Strategy::parse("regex").is_err());
}

#[test]
fn strategy_prefix_detection() {
    assert!(has_strategy_prefix("id:42"));
    assert!(has_strategy_prefix("xpath://a"));
    assert!(!has_strategy_prefix("OKButton"));
    assert!(!has_strategy_prefix("css:.button"));
}

#[test]
fn examples_cover_every_strategy() {
    let examples = valid_examples();
    for strategy in Strategy::ALL {
        assert!(
            examples.contains(&format!("{strategy}:")),
            "missing example for {strategy}"
        );
    }
}

#[test]
fn window_locator_joins_supplied_fragments() {
    assert_eq!(
        window_locator(Some("Notepad"), Some("EditWin"), Some(42)).unwrap(),
        "name:Notepad class:EditWin pid:42"
    );
    assert_eq!(window_locator(None, Some("EditWin"), None).unwrap(), "class:EditWin");
    assert_eq!(window_locator(None, None, Some(7)).unwrap(), "pid:7");
    assert_eq!(window_locator(None, None, None), None);
}
