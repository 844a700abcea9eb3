//! Pine Script chart annotation generation.
//!
//! Resolves `{{PLACEHOLDER}}` markers in a Pine template (the built-in default
//! or a custom file via `[script] template_path`) using the draw-call helpers
//! in [`draw`].

pub mod default_template;
pub mod draw;

use std::fmt;
use std::str::FromStr;

use crate::domain::classify::OutcomeBuckets;
use crate::domain::clock::ClockOffsets;
use crate::domain::error::TradeplotError;
use crate::ports::script_port::ScriptPort;

/// Marker size levels offered by the script's icon-size selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IconSize {
    Tiny,
    Small,
    #[default]
    Normal,
    Large,
    Huge,
}

impl IconSize {
    pub const ALL: [IconSize; 5] = [
        IconSize::Tiny,
        IconSize::Small,
        IconSize::Normal,
        IconSize::Large,
        IconSize::Huge,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IconSize::Tiny => "tiny",
            IconSize::Small => "small",
            IconSize::Normal => "normal",
            IconSize::Large => "large",
            IconSize::Huge => "huge",
        }
    }
}

impl fmt::Display for IconSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IconSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        IconSize::ALL
            .into_iter()
            .find(|size| size.as_str() == wanted)
            .ok_or_else(|| format!("unknown icon size {s:?} (expected tiny, small, normal, large or huge)"))
    }
}

/// Context for resolving template placeholders.
pub struct ScriptContext<'a> {
    pub instrument: &'a str,
    pub buckets: &'a OutcomeBuckets,
    pub icon_size: IconSize,
    pub clock: &'a ClockOffsets,
}

/// Resolve all `{{PLACEHOLDER}}`s in `template` and return the script text.
pub fn resolve(template: &str, ctx: &ScriptContext) -> Result<String, TradeplotError> {
    if !template.contains("{{DRAW_CALLS}}") {
        return Err(TradeplotError::Template {
            reason: "template has no {{DRAW_CALLS}} placeholder".into(),
        });
    }

    let title = draw::pine_string(&format!("{} Trades", ctx.instrument.to_uppercase()));
    let draw_calls = draw::render_draw_calls(ctx.buckets, ctx.clock)?;

    let output = template
        .replace("{{TITLE}}", &title)
        .replace("{{INSTRUMENT}}", &ctx.instrument.to_uppercase())
        .replace("{{ICON_SIZE}}", &draw::pine_string(ctx.icon_size.as_str()))
        .replace("{{TRADE_SUMMARY}}", &draw::render_trade_summary(ctx.buckets))
        .replace("{{DRAW_CALLS}}", &draw_calls);

    Ok(output)
}

/// Script adapter holding the rendering settings for one run.
pub struct PineScriptAdapter {
    template: Option<String>,
    icon_size: IconSize,
    clock: ClockOffsets,
}

impl PineScriptAdapter {
    pub fn new(clock: ClockOffsets) -> Self {
        Self {
            template: None,
            icon_size: IconSize::default(),
            clock,
        }
    }

    pub fn with_icon_size(mut self, icon_size: IconSize) -> Self {
        self.icon_size = icon_size;
        self
    }

    /// Use a custom template instead of [`default_template::template`].
    pub fn with_template(mut self, template: String) -> Self {
        self.template = Some(template);
        self
    }
}

impl ScriptPort for PineScriptAdapter {
    fn render(&self, instrument: &str, buckets: &OutcomeBuckets) -> Result<String, TradeplotError> {
        let template = self
            .template
            .as_deref()
            .unwrap_or(default_template::template());
        let ctx = ScriptContext {
            instrument,
            buckets,
            icon_size: self.icon_size,
            clock: &self.clock,
        };
        resolve(template, &ctx)
    }
}
