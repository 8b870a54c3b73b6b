//! Lifecycle-window birth rules.
//!
//! These rules depend on causal time, which only exists relative to a time
//! proof. They are evaluated once per time proof through a [`CausalClock`].
//! At the causal time of the birth, each parent must
//!
//! - be a member of the time proof,
//! - still be alive (`now < born + lifecycle`),
//! - have existed for at least a quarter of the minimum lifetime,
//! - not have co-signed another birth less than a quarter of the minimum
//!   lifetime before or after `now`.

use crate::error::BirthError;
use crate::group::Group;
use kinship_core::{Hash, NaturalLawConfig};

/// Causal time as seen from one time proof.
pub trait CausalClock {
    /// Causal time of the birth being evaluated.
    fn now(&self) -> u64;

    /// Birth time of an account, or `None` if the account is not a member
    /// of this time proof.
    fn born_at(&self, account: &Hash) -> Option<u64>;
}

#[derive(Debug, Clone, Copy)]
pub struct NaturalLaw {
    config: NaturalLawConfig,
}

impl NaturalLaw {
    pub fn new(config: NaturalLawConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NaturalLawConfig {
        &self.config
    }

    /// Check both parents of a birth against one time proof.
    pub fn check_parents<C: CausalClock>(
        &self,
        group: &Group,
        parents: &[Hash; 2],
        clock: &C,
    ) -> Result<(), BirthError> {
        for parent in parents {
            self.check_parent(group, parent, clock)?;
        }
        Ok(())
    }

    fn check_parent<C: CausalClock>(
        &self,
        group: &Group,
        parent: &Hash,
        clock: &C,
    ) -> Result<(), BirthError> {
        let quarter = self.config.quarter_lifetime();
        let now = clock.now();
        let born = clock
            .born_at(parent)
            .ok_or(BirthError::ParentNotInTimeProof(*parent))?;
        let lifecycle = group
            .lifecycle(parent)
            .ok_or(BirthError::UnknownParent(*parent))?;

        if now >= born.saturating_add(lifecycle) {
            return Err(BirthError::ParentExpired {
                parent: *parent,
                born,
                lifecycle,
                now,
            });
        }

        let age = now.saturating_sub(born);
        if age < quarter {
            return Err(BirthError::ParentTooYoung {
                parent: *parent,
                age,
                required: quarter,
            });
        }

        // children outside this time proof are invisible to it
        for child in group.children(parent) {
            if let Some(last) = clock.born_at(child) {
                if now.abs_diff(last) < quarter {
                    return Err(BirthError::CosignRateLimited {
                        parent: *parent,
                        last,
                        now,
                    });
                }
            }
        }
        Ok(())
    }
}
