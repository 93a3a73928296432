//! Compiled selectors for the engine's result markup
//!
//! Every marker the classifier and walker look for lives here, so a change in
//! the engine's HTML only touches the `[markup]` configuration section.

use crate::config::MarkupConfig;
use crate::{ConfigError, ConfigResult};
use scraper::Selector;

const ANCHOR_WITH_HREF: &str = "a[href]";

/// Compiled form of [`MarkupConfig`]
#[derive(Debug, Clone)]
pub struct Markup {
    pub(crate) no_results: Selector,
    pub(crate) pagination: Selector,
    pub(crate) current: Selector,
    pub(crate) disabled: Selector,
    pub(crate) total: Selector,
    pub(crate) link: Selector,
    pub(crate) result: Selector,
    pub(crate) result_title: Selector,
    pub(crate) anchor: Selector,
    pub(crate) previous_label: String,
    pub(crate) next_label: String,
}

impl Markup {
    /// Compiles every selector in the configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Markup)` - All selectors compiled
    /// * `Err(ConfigError::InvalidSelector)` - The first selector that failed, with its field name
    pub fn compile(config: &MarkupConfig) -> ConfigResult<Self> {
        Ok(Self {
            no_results: compile_selector("no-results", &config.no_results)?,
            pagination: compile_selector("pagination", &config.pagination)?,
            current: compile_selector("current", &config.current)?,
            disabled: compile_selector("disabled", &config.disabled)?,
            total: compile_selector("total", &config.total)?,
            link: compile_selector("link", &config.link)?,
            result: compile_selector("result", &config.result)?,
            result_title: compile_selector("result-title", &config.result_title)?,
            anchor: compile_selector("anchor", ANCHOR_WITH_HREF)?,
            previous_label: config.previous_label.trim().to_string(),
            next_label: config.next_label.trim().to_string(),
        })
    }

    /// True if `text` is one of the previous/next control labels
    pub fn is_control_label(&self, text: &str) -> bool {
        text == self.previous_label || text == self.next_label
    }
}

fn compile_selector(field: &'static str, css: &str) -> ConfigResult<Selector> {
    Selector::parse(css).map_err(|e| ConfigError::InvalidSelector {
        field,
        selector: css.to_string(),
        message: format!("{:?}", e),
    })
}
