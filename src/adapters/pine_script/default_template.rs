//! Built-in Pine Script v5 template with `{{PLACEHOLDER}}` substitution.

const DEFAULT_TEMPLATE: &str = r#"//@version=5
indicator({{TITLE}}, overlay=true, max_labels_count=500, max_lines_count=500)
{{TRADE_SUMMARY}}

iconSizeInput = input.string({{ICON_SIZE}}, "Icon Size", options=["tiny", "small", "normal", "large", "huge"])
iconSize = switch iconSizeInput
    "tiny" => size.tiny
    "small" => size.small
    "large" => size.large
    "huge" => size.huge
    => size.normal

var bool drawn = false
if not drawn
    drawn := true
{{DRAW_CALLS}}
"#;

pub fn template() -> &'static str {
    DEFAULT_TEMPLATE
}
