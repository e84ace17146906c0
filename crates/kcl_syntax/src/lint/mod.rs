//! The lint engine: multiplexes an ordered set of rules over a parse
//! result, collecting their diagnostics while isolating rule failures.

pub mod rules;

use std::collections::{HashMap, HashSet};
use std::panic::{self, AssertUnwindSafe};

use kcl_base::{CancellationToken, Interner};

use crate::ast::Program;
use crate::diagnostic::{Diagnostic, Severity};
use crate::line_index::LineIndex;
use crate::token::Token;

/// Per-invocation context a rule's `check` receives. Rules may walk the
/// AST; they must not mutate it.
pub struct LintContext<'a> {
    pub program: &'a Program,
    pub tokens: &'a [Token],
    pub line_index: &'a LineIndex,
    pub interner: &'a Interner,
    pub source_text: Option<&'a str>,
}

pub trait Rule {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn default_severity(&self) -> Severity;
    fn check(&self, ctx: &LintContext) -> Vec<Diagnostic>;
}

#[derive(Debug, Clone, Default)]
pub struct LintConfig {
    pub enabled: bool,
    pub disabled_rules: HashSet<String>,
    pub severity_override: HashMap<String, Severity>,
}

impl LintConfig {
    pub fn new() -> Self {
        LintConfig { enabled: true, disabled_rules: HashSet::new(), severity_override: HashMap::new() }
    }
}

/// Runs an ordered list of rules against a [`LintContext`], in registration
/// order. A rule that panics is logged and skipped; it never aborts the
/// rest of the batch.
pub struct LintEngine {
    rules: Vec<Box<dyn Rule>>,
    config: LintConfig,
}

impl LintEngine {
    pub fn new(config: LintConfig) -> Self {
        LintEngine { rules: Vec::new(), config }
    }

    pub fn register(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    /// Convenience constructor registering the built-in rule set.
    pub fn with_default_rules(config: LintConfig) -> Self {
        let mut engine = Self::new(config);
        engine.register(Box::new(rules::CamelCaseRule));
        engine.register(Box::new(rules::UnusedVariableRule));
        engine.register(Box::new(rules::MagicNumbersRule));
        engine
    }

    /// Runs every registered rule against `ctx` in registration order.
    ///
    /// Convenience wrapper over [`LintEngine::run_cancellable`] for callers
    /// that have no cancellation source; equivalent to passing a token that
    /// is never cancelled.
    pub fn run(&self, ctx: &LintContext) -> Vec<Diagnostic> {
        self.run_cancellable(ctx, &CancellationToken::new())
    }

    /// Like [`LintEngine::run`], but checks `token` between rule
    /// invocations. A cancellation observed partway through the batch
    /// discards whatever diagnostics were already collected and returns an
    /// empty set, per §5's cancellation contract — a cancelled request
    /// should never hand back a partial, misleading result.
    pub fn run_cancellable(&self, ctx: &LintContext, token: &CancellationToken) -> Vec<Diagnostic> {
        if !self.config.enabled {
            return Vec::new();
        }
        let mut diagnostics = Vec::new();
        for rule in &self.rules {
            if token.is_cancelled() {
                return Vec::new();
            }
            if self.config.disabled_rules.contains(rule.name()) {
                continue;
            }
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| rule.check(ctx)));
            match outcome {
                Ok(mut found) => {
                    let severity = self
                        .config
                        .severity_override
                        .get(rule.name())
                        .copied()
                        .unwrap_or_else(|| rule.default_severity());
                    for diag in &mut found {
                        diag.severity = severity;
                    }
                    diagnostics.extend(found);
                }
                Err(_) => {
                    log::error!("lint rule '{}' panicked while analyzing; skipping it", rule.name());
                }
            }
        }
        diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Range;
    use crate::line_index::Position;
    use crate::parser::parse;

    struct FaultyRule;
    impl Rule for FaultyRule {
        fn name(&self) -> &str { "faulty" }
        fn description(&self) -> &str { "always panics" }
        fn default_severity(&self) -> Severity { Severity::Warning }
        fn check(&self, _ctx: &LintContext) -> Vec<Diagnostic> {
            panic!("boom");
        }
    }

    struct AlwaysOneRule;
    impl Rule for AlwaysOneRule {
        fn name(&self) -> &str { "always-one" }
        fn description(&self) -> &str { "always emits one diagnostic" }
        fn default_severity(&self) -> Severity { Severity::Hint }
        fn check(&self, _ctx: &LintContext) -> Vec<Diagnostic> {
            vec![Diagnostic::new(
                Range::new(Position::new(0, 0), Position::new(0, 1)),
                Severity::Hint,
                "kcl",
                "always",
            )]
        }
    }

    #[test]
    fn faulty_rule_is_isolated_from_the_batch() {
        let mut interner = Interner::new();
        let result = parse("let x = 1", &mut interner);
        let ctx = LintContext {
            program: &result.program,
            tokens: &result.tokens,
            line_index: &result.line_index,
            interner: &interner,
            source_text: None,
        };
        let mut engine = LintEngine::new(LintConfig::new());
        engine.register(Box::new(FaultyRule));
        engine.register(Box::new(AlwaysOneRule));
        let diags = panic::catch_unwind(AssertUnwindSafe(|| engine.run(&ctx))).unwrap();
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn disabled_rule_produces_no_diagnostics() {
        let mut interner = Interner::new();
        let result = parse("let x = 1", &mut interner);
        let ctx = LintContext {
            program: &result.program,
            tokens: &result.tokens,
            line_index: &result.line_index,
            interner: &interner,
            source_text: None,
        };
        let mut config = LintConfig::new();
        config.disabled_rules.insert("always-one".to_string());
        let mut engine = LintEngine::new(config);
        engine.register(Box::new(AlwaysOneRule));
        assert!(engine.run(&ctx).is_empty());
    }

    #[test]
    fn severity_override_replaces_default_severity() {
        let mut interner = Interner::new();
        let result = parse("let x = 1", &mut interner);
        let ctx = LintContext {
            program: &result.program,
            tokens: &result.tokens,
            line_index: &result.line_index,
            interner: &interner,
            source_text: None,
        };
        let mut config = LintConfig::new();
        config.severity_override.insert("always-one".to_string(), Severity::Error);
        let mut engine = LintEngine::new(config);
        engine.register(Box::new(AlwaysOneRule));
        let diags = engine.run(&ctx);
        assert_eq!(diags[0].severity, Severity::Error);
    }

    #[test]
    fn cancelled_token_yields_empty_diagnostics() {
        let mut interner = Interner::new();
        let result = parse("let my_variable = 1", &mut interner);
        let ctx = LintContext {
            program: &result.program,
            tokens: &result.tokens,
            line_index: &result.line_index,
            interner: &interner,
            source_text: None,
        };
        let mut engine = LintEngine::new(LintConfig::new());
        engine.register(Box::new(AlwaysOneRule));
        let token = kcl_base::CancellationToken::new();
        token.cancel();
        assert!(engine.run_cancellable(&ctx, &token).is_empty());
    }

    #[test]
    fn disabled_engine_produces_no_diagnostics_at_all() {
        let mut interner = Interner::new();
        let result = parse("let x = 1", &mut interner);
        let ctx = LintContext {
            program: &result.program,
            tokens: &result.tokens,
            line_index: &result.line_index,
            interner: &interner,
            source_text: None,
        };
        let mut config = LintConfig::new();
        config.enabled = false;
        let mut engine = LintEngine::new(config);
        engine.register(Box::new(AlwaysOneRule));
        assert!(engine.run(&ctx).is_empty());
    }
}
