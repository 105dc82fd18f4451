//! The optimizer: validation, rule application, serialization, statistics.

use crate::config::Options;
use crate::error::ShrinkError;
use crate::metadata::Metadata;
use crate::parse::parse_svg;
use crate::rules::{Rule, RuleKind};
use crate::source::ContentSource;
use crate::validate::{is_valid, strip_xml_declaration};

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct Optimized {
    pub markup: String,
    pub metadata: Metadata,
}

/// An ordered, reusable list of rules.
#[derive(Debug)]
pub struct Optimizer {
    rules: Vec<Box<dyn Rule>>,
}

impl Default for Optimizer {
    fn default() -> Self {
        Self::new(&Options::default())
    }
}

impl Optimizer {
    /// Build the rule list described by `options`.
    pub fn new(options: &Options) -> Self {
        let rules = options
            .enabled_rules()
            .into_iter()
            .map(|kind| kind.build(options.shorthand_colors))
            .collect();
        Self { rules }
    }

    pub fn builder() -> OptimizerBuilder {
        OptimizerBuilder::default()
    }

    /// Names of the configured rules, in run order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Optimize one SVG document.
    ///
    /// Either every configured rule succeeds or an error is returned; there
    /// is no partially optimized output.
    pub fn optimize(&self, raw: &str) -> Result<Optimized, ShrinkError> {
        if !is_valid(raw) {
            return Err(ShrinkError::Validation("input does not start with an <svg> element".into()));
        }

        let mut doc = parse_svg(raw)?;

        for rule in &self.rules {
            tracing::debug!(rule = rule.name(), "applying rule");
            if let Err(e) = rule.apply(&mut doc) {
                tracing::error!(rule = rule.name(), error = %e, "rule failed");
                return Err(e);
            }
        }

        let serialized = doc.to_markup();
        let markup = strip_xml_declaration(&serialized).trim().to_string();
        let metadata = Metadata::from_markup(raw, &markup)?;

        tracing::info!(
            rules = self.rules.len(),
            original = metadata.original_size,
            optimized = metadata.optimized_size,
            "optimized document"
        );

        Ok(Optimized { markup, metadata })
    }

    /// Read from `source`, optimize, and write the result back to it.
    /// Nothing is written if optimization fails.
    pub fn optimize_source(&self, source: &mut dyn ContentSource) -> Result<Metadata, ShrinkError> {
        let input = source.input_content()?;
        let optimized = self.optimize(&input)?;
        source.write_output(&optimized.markup)?;
        Ok(optimized.metadata)
    }
}

/// Fluent construction of an [`Optimizer`] with a custom rule order.
#[derive(Debug, Default)]
pub struct OptimizerBuilder {
    rules: Vec<Box<dyn Rule>>,
    shorthand_colors: bool,
}

impl OptimizerBuilder {
    /// Use `#rgb` shorthand in rules added after this call.
    pub fn shorthand_colors(mut self, enabled: bool) -> Self {
        self.shorthand_colors = enabled;
        self
    }

    /// Append a built-in rule.
    pub fn rule(mut self, kind: RuleKind) -> Self {
        self.rules.push(kind.build(self.shorthand_colors));
        self
    }

    /// Append several built-in rules in order.
    pub fn rules(self, kinds: impl IntoIterator<Item = RuleKind>) -> Self {
        kinds.into_iter().fold(self, Self::rule)
    }

    /// Append all built-in rules in the default order.
    pub fn defaults(self) -> Self {
        self.rules(RuleKind::ALL)
    }

    /// Append a custom rule.
    pub fn custom(mut self, rule: impl Rule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn build(self) -> Optimizer {
        Optimizer { rules: self.rules }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Document;

    #[test]
    fn test_rejects_non_svg() {
        let err = Optimizer::default().optimize("<html/>").unwrap_err();
        assert!(matches!(err, ShrinkError::Validation(_)));
    }

    #[test]
    fn test_strips_declaration_and_trims() {
        let optimizer = Optimizer::builder().build();
        let out = optimizer
            .optimize("<?xml version=\"1.0\"?>\n<svg><rect/></svg>\n")
            .unwrap();
        assert_eq!(out.markup, "<svg><rect/></svg>");
    }

    #[test]
    fn test_builder_order() {
        let optimizer = Optimizer::builder()
            .rule(RuleKind::SortAttributes)
            .rule(RuleKind::FlattenGroups)
            .build();
        assert_eq!(optimizer.rule_names(), ["sort-attributes", "flatten-groups"]);
        assert_eq!(Optimizer::builder().defaults().build().rule_names().len(), 16);
    }

    #[derive(Debug)]
    struct Explode;

    impl Rule for Explode {
        fn name(&self) -> &'static str {
            "explode"
        }

        fn apply(&self, _doc: &mut Document) -> Result<(), ShrinkError> {
            Err(ShrinkError::processing("explode", "boom"))
        }
    }

    #[test]
    fn test_failing_rule_aborts_run() {
        let optimizer = Optimizer::builder()
            .rule(RuleKind::ConvertColorsToHex)
            .custom(Explode)
            .rule(RuleKind::SortAttributes)
            .build();
        let err = optimizer.optimize("<svg/>").unwrap_err();
        assert!(matches!(err, ShrinkError::Processing { rule: "explode", .. }));
    }

    #[test]
    fn test_optimize_source() {
        use crate::source::StringSource;

        let optimizer = Optimizer::builder().rule(RuleKind::RemoveComments).build();
        let mut source = StringSource::new("<svg><!-- x --><rect/></svg>");
        let metadata = optimizer.optimize_source(&mut source).unwrap();
        assert_eq!(source.output(), Some("<svg><rect/></svg>"));
        assert_eq!(metadata.saved_bytes, 10);

        let mut bad = StringSource::new("not svg");
        assert!(optimizer.optimize_source(&mut bad).is_err());
        assert_eq!(bad.output(), None);
    }

    #[test]
    fn test_optimizer_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Optimizer>();
    }
}
