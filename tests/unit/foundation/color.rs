use super::*;

#[test]
fn parses_hex_forms() {
    assert_eq!(parse_css_color("#ff0000").unwrap(), Rgba8::new(255, 0, 0, 255));
    assert_eq!(parse_css_color("#F00").unwrap(), Rgba8::new(255, 0, 0, 255));
    assert_eq!(parse_css_color("#0000ff80").unwrap(), Rgba8::new(0, 0, 255, 128));
    assert_eq!(parse_css_color("#0f08").unwrap(), Rgba8::new(0, 255, 0, 136));
    assert!(parse_css_color("#12345").is_err());
    assert!(parse_css_color("#gg0000").is_err());
}

#[test]
fn parses_functional_forms() {
    assert_eq!(
        parse_css_color("rgb(10, 20, 30)").unwrap(),
        Rgba8::new(10, 20, 30, 255)
    );
    assert_eq!(
        parse_css_color("rgba(0,0,0,0.5)").unwrap(),
        Rgba8::new(0, 0, 0, 128)
    );
    assert_eq!(
        parse_css_color("rgb(255 0 0 / 50%)").unwrap(),
        Rgba8::new(255, 0, 0, 128)
    );
    assert_eq!(
        parse_css_color("hsl(0, 100%, 50%)").unwrap(),
        Rgba8::new(255, 0, 0, 255)
    );
    assert_eq!(
        parse_css_color("hsla(120deg, 100%, 50%, 1)").unwrap(),
        Rgba8::new(0, 255, 0, 255)
    );
}

#[test]
fn parses_named_and_rejects_unknown() {
    assert_eq!(parse_css_color(" White ").unwrap(), Rgba8::new(255, 255, 255, 255));
    assert_eq!(parse_css_color("transparent").unwrap(), Rgba8::TRANSPARENT);
    assert!(parse_css_color("not-a-color").is_err());
    assert!(parse_css_color("").is_err());
}
