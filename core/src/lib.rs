//! # Gated Registry Core
//!
//! Core traits and types for the NFT-gated event registry.
//!
//! The registry is written as a reducer: a function that validates an action
//! against the current state, applies it, and describes the notifications to
//! publish. Everything external (time, NFT ownership) arrives through traits
//! injected in an environment, so the reducer stays deterministic under test.
//!
//! ## Core Concepts
//!
//! - **State**: All registry data, owned by one serialization boundary
//! - **Action**: A mutating request (create an event, register for one)
//! - **Reducer**: `(State, Action, Environment) → Result<(Output, Effects), Error>`
//! - **Effect**: A description of a notification to publish, not its delivery
//! - **Environment**: Injected dependencies via traits
//!
//! ## Atomicity
//!
//! A reducer must check every precondition before it writes to state. When it
//! returns `Err`, the state it was handed is unchanged; the runtime relies on
//! this to give each action all-or-nothing semantics.
//!
//! ## Example
//!
//! ```ignore
//! impl Reducer for RegistryReducer {
//!     type State = RegistryState;
//!     type Action = RegistryAction;
//!     type Environment = RegistryEnvironment<O, C>;
//!     type Output = RegistryOutcome;
//!     type Notification = RegistryNotification;
//!     type Error = RegistryError;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut RegistryState,
//!         action: RegistryAction,
//!         env: &Self::Environment,
//!     ) -> Result<Reduction<RegistryOutcome, RegistryNotification>, RegistryError> {
//!         // Validate, then mutate, then describe notifications
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{SmallVec, smallvec};

/// Principal and collection identifiers
pub mod identity;

/// NFT ownership oracle trait and adapters
pub mod oracle;

/// Reducer module - The core trait for business logic
///
/// Reducers are functions: `(State, Action, Environment) → Result<Reduction, Error>`
///
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// Successful result of reducing one action
    ///
    /// Carries the value returned to the caller and the effects the runtime
    /// must execute before the action is considered complete.
    #[derive(Debug)]
    pub struct Reduction<O, N> {
        /// Value handed back to the caller
        pub output: O,
        /// Effects to execute, in order
        pub effects: SmallVec<[Effect<N>; 4]>,
    }

    impl<O, N> Reduction<O, N> {
        /// A reduction with no effects
        #[must_use]
        pub fn new(output: O) -> Self {
            Self {
                output,
                effects: SmallVec::new(),
            }
        }

        /// Append an effect
        #[must_use]
        pub fn with_effect(mut self, effect: Effect<N>) -> Self {
            self.effects.push(effect);
            self
        }
    }

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    /// - `Output`: The value returned to the caller on success
    /// - `Notification`: The payload of `Publish` effects
    /// - `Error`: The rejection type
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// The value produced by a successful action
        type Output;

        /// Notification type published through effects
        type Notification;

        /// Rejection type
        type Error;

        /// Reduce an action into state changes and effects
        ///
        /// 1. Validates the action against `state` and `env`
        /// 2. Updates state in place (only after validation passed)
        /// 3. Returns the output and effect descriptions
        ///
        /// # Errors
        ///
        /// Returns `Self::Error` when the action is rejected. `state` must be
        /// left exactly as it was received in that case.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> Result<Reduction<Self::Output, Self::Notification>, Self::Error>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution).
pub mod effect {
    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed by the reducer. They are returned from it and
    /// executed by the Store while the action is still serialized.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Effect<N> {
        /// No-op effect
        None,

        /// Publish a notification to observers
        Publish(N),

        /// Run effects in order
        Sequential(Vec<Effect<N>>),
    }

    impl<N> Effect<N> {
        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<N>>) -> Effect<N> {
            Effect::Sequential(effects)
        }

        /// Visit every notification in execution order
        pub fn for_each_notification<F>(self, f: &mut F)
        where
            F: FnMut(N),
        {
            match self {
                Effect::None => {},
                Effect::Publish(notification) => f(notification),
                Effect::Sequential(effects) => {
                    for effect in effects {
                        effect.for_each_notification(f);
                    }
                },
            }
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter.
pub mod environment {
    use chrono::{DateTime, Utc};

    pub use crate::oracle::OwnershipOracle;

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // Test - fixed time for deterministic tests
    /// struct FixedClock { time: DateTime<Utc> }
    /// impl Clock for FixedClock {
    ///     fn now(&self) -> DateTime<Utc> {
    ///         self.time
    ///     }
    /// }
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
