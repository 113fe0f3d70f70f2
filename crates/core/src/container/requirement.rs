//! Constructor requirements
//!
//! Every controller declares its constructor statically through
//! [`Dependencies`]: how many parameters it takes, optionally the provider
//! type each parameter expects, and the injectable tokens declared on
//! individual parameters. [`Dependencies::plan`] turns that declaration into
//! the ordered [`Requirement`] list the resolver consumes, before anything is
//! constructed.

use crate::container::descriptor::ProviderId;
use crate::container::tokens::InjectableToken;
use crate::errors::CoreError;
use std::collections::BTreeMap;

/// One constructor parameter slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    /// Provider type expected for the slot
    pub required: Option<ProviderId>,
    /// Explicit token declared for the slot
    pub token: Option<InjectableToken>,
}

impl Requirement {
    /// Requirement matched by type
    pub fn of_type(required: ProviderId) -> Self {
        Self {
            required: Some(required),
            token: None,
        }
    }

    /// Requirement matched by token only
    pub fn by_token(token: InjectableToken) -> Self {
        Self {
            required: None,
            token: Some(token),
        }
    }

    /// Human readable form used in error messages: the required type's name,
    /// or the token's string form
    pub fn describe(&self) -> String {
        match (&self.required, &self.token) {
            (Some(required), _) => required.short_name(),
            (None, Some(token)) => token.to_string(),
            (None, None) => "<unspecified>".to_string(),
        }
    }
}

/// How a requirement list was derived
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanStrategy {
    /// Declared parameter types cover the whole constructor
    Reflected,
    /// Parameter types absent or incomplete; declared tokens are used
    Fallback,
}

/// Static description of a constructor's parameters
#[derive(Debug, Clone, Default)]
pub struct Dependencies {
    arity: usize,
    reflected: Option<Vec<ProviderId>>,
    tokens: BTreeMap<usize, InjectableToken>,
}

impl Dependencies {
    /// A constructor without parameters
    pub fn none() -> Self {
        Self::default()
    }

    /// A constructor taking `arity` parameters, with nothing declared yet
    pub fn with_arity(arity: usize) -> Self {
        Self {
            arity,
            ..Self::default()
        }
    }

    /// A constructor whose parameters are fully described by `types`
    pub fn typed(types: Vec<ProviderId>) -> Self {
        Self {
            arity: types.len(),
            reflected: Some(types),
            tokens: BTreeMap::new(),
        }
    }

    /// Append the declared type of the next parameter
    ///
    /// The list only counts as complete once its length equals the arity.
    pub fn param<T: ?Sized + 'static>(mut self) -> Self {
        self.reflected
            .get_or_insert_with(Vec::new)
            .push(ProviderId::of::<T>());
        self
    }

    /// Declare an injectable token on parameter `index`
    pub fn inject(mut self, index: usize, token: impl Into<InjectableToken>) -> Self {
        self.tokens.insert(index, token.into());
        self
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn reflected(&self) -> Option<&[ProviderId]> {
        self.reflected.as_deref()
    }

    pub fn tokens(&self) -> impl Iterator<Item = (usize, &InjectableToken)> {
        self.tokens.iter().map(|(index, token)| (*index, token))
    }

    /// Which strategy [`plan`](Self::plan) takes for this declaration
    pub fn strategy(&self) -> PlanStrategy {
        match &self.reflected {
            Some(types) if types.len() == self.arity => PlanStrategy::Reflected,
            _ => PlanStrategy::Fallback,
        }
    }

    /// Build the ordered requirement list for `controller`
    ///
    /// Reflected types become type-only requirements. Otherwise each parameter
    /// must carry a declared token, and the first one without fails with
    /// [`CoreError::MissingInjectable`].
    pub fn plan(&self, controller: &str) -> Result<Vec<Requirement>, CoreError> {
        if let (PlanStrategy::Reflected, Some(types)) = (self.strategy(), &self.reflected) {
            return Ok(types.iter().copied().map(Requirement::of_type).collect());
        }

        if let Some(types) = &self.reflected {
            tracing::warn!(
                target: "trellis::resolver",
                controller,
                declared_types = types.len(),
                arity = self.arity,
                "Declared parameter types do not cover the constructor, falling back to injectable tokens"
            );
        }

        (0..self.arity)
            .map(|index| {
                self.tokens
                    .get(&index)
                    .cloned()
                    .map(Requirement::by_token)
                    .ok_or_else(|| CoreError::MissingInjectable {
                        controller: controller.to_string(),
                        parameter_index: index,
                        arity: self.arity,
                        declared: self.tokens.len(),
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Database;
    struct Cache;

    #[test]
    fn test_reflected_plan_ignores_tokens() {
        let dependencies = Dependencies::with_arity(2)
            .param::<Database>()
            .param::<Cache>()
            .inject(0, "primary");

        assert_eq!(dependencies.strategy(), PlanStrategy::Reflected);
        let plan = dependencies.plan("Reports").unwrap();
        assert_eq!(
            plan,
            vec![
                Requirement::of_type(ProviderId::of::<Database>()),
                Requirement::of_type(ProviderId::of::<Cache>()),
            ]
        );
    }

    #[test]
    fn test_short_reflection_falls_back_to_tokens() {
        let dependencies = Dependencies::with_arity(2)
            .param::<Database>()
            .inject(0, "db")
            .inject(1, "cache");

        assert_eq!(dependencies.strategy(), PlanStrategy::Fallback);
        let plan = dependencies.plan("Reports").unwrap();
        assert_eq!(plan[0], Requirement::by_token(InjectableToken::named("db")));
        assert_eq!(plan[1], Requirement::by_token(InjectableToken::named("cache")));
    }

    #[test]
    fn test_fallback_without_enough_tokens_fails() {
        let error = Dependencies::with_arity(2)
            .inject(0, "db")
            .plan("Reports")
            .unwrap_err();

        match error {
            CoreError::MissingInjectable {
                controller,
                parameter_index,
                arity,
                declared,
            } => {
                assert_eq!(controller, "Reports");
                assert_eq!(parameter_index, 1);
                assert_eq!(arity, 2);
                assert_eq!(declared, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_zero_arity_plans_nothing() {
        assert!(Dependencies::none().plan("Health").unwrap().is_empty());
        assert_eq!(Dependencies::typed(vec![]).strategy(), PlanStrategy::Reflected);
    }

    #[test]
    fn test_describe() {
        assert_eq!(Requirement::of_type(ProviderId::of::<Cache>()).describe(), "Cache");
        assert_eq!(
            Requirement::by_token(InjectableToken::named("cache")).describe(),
            "cache"
        );
    }
}
