use super::skeleton::{unix_timestamp, Skeleton};
use super::state::SkeletonState;
use crate::core::error::{check_index, Collection, CoreError, Result};
use crate::core::patch::{Field, Patch, PatchValue};
use serde::{Deserialize, Serialize};

/// Ordered poses of one skeleton. `transitions[i]` is the time spent moving
/// from `states[i]` into `states[i + 1]`, so there is always one transition
/// fewer than there are states.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    #[serde(default)]
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    skeleton_name: Option<String>,
    #[serde(default)]
    states: Vec<SkeletonState>,
    #[serde(default)]
    transitions: Vec<f64>,
}

impl Default for Animation {
    fn default() -> Self {
        Self::new(None, None)
    }
}

fn check_transition(value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(CoreError::InvalidPatchValue { field: "transition_time", reason: format!("{value} must be finite and >= 0") })
    }
}

impl Animation {
    pub fn new(skeleton: Option<&Skeleton>, name: Option<String>) -> Self {
        Self {
            name: name.unwrap_or_else(|| format!("animation_{}", unix_timestamp())),
            skeleton_name: skeleton.map(|s| s.name().to_string()),
            states: Vec::new(),
            transitions: Vec::new(),
        }
    }

    pub fn named(name: impl Into<String>, skeleton: &Skeleton) -> Self {
        Self::new(Some(skeleton), Some(name.into()))
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn skeleton_name(&self) -> Option<&str> { self.skeleton_name.as_deref() }
    pub fn number_of_states(&self) -> usize { self.states.len() }
    pub fn states(&self) -> &[SkeletonState] { &self.states }
    pub fn transitions(&self) -> &[f64] { &self.transitions }
    pub fn total_duration(&self) -> f64 { self.transitions.iter().sum() }

    pub fn get_state(&self, index: usize) -> Result<&SkeletonState> {
        check_index(Collection::States, index, self.states.len())?;
        Ok(&self.states[index])
    }

    /// Time spent arriving at state `index`; zero for the first state.
    pub fn transition_into(&self, index: usize) -> Result<f64> {
        check_index(Collection::States, index, self.states.len())?;
        Ok(if index == 0 { 0.0 } else { self.transitions[index - 1] })
    }

    fn check_state(&self, state: &SkeletonState) -> Result<()> {
        let Some(expected) = self.skeleton_name.as_deref() else {
            return Err(CoreError::NoSkeleton { animation: self.name.clone() });
        };
        if state.skeleton_name() != Some(expected) {
            return Err(CoreError::SkeletonMismatch {
                expected: expected.to_string(),
                found: state.skeleton_name().map(str::to_string),
            });
        }
        Ok(())
    }

    pub fn add_state(&mut self, state: SkeletonState, transition_time: f64) -> Result<()> {
        self.check_state(&state)?;
        let transition_time = check_transition(transition_time)?;
        if !self.states.is_empty() {
            self.transitions.push(transition_time);
        }
        self.states.push(state);
        Ok(())
    }

    /// Replaces the state at `index`, returning the old one. Transitions are
    /// untouched.
    pub fn update_state(&mut self, index: usize, state: SkeletonState) -> Result<SkeletonState> {
        self.check_state(&state)?;
        check_index(Collection::States, index, self.states.len())?;
        Ok(std::mem::replace(&mut self.states[index], state))
    }

    /// Removes a state together with its paired transition, which is
    /// returned alongside it (`None` when it was the only state).
    pub fn remove_state(&mut self, index: usize) -> Result<(SkeletonState, Option<f64>)> {
        check_index(Collection::States, index, self.states.len())?;
        let state = self.states.remove(index);
        let slot = index.saturating_sub(1);
        let transition = (slot < self.transitions.len()).then(|| self.transitions.remove(slot));
        Ok((state, transition))
    }

    /// Undoes [`Animation::remove_state`] given what it returned.
    pub fn insert_state(&mut self, index: usize, state: SkeletonState, transition: Option<f64>) -> Result<()> {
        self.check_state(&state)?;
        check_index(Collection::States, index, self.states.len() + 1)?;
        let expected_paired = !self.states.is_empty();
        if transition.is_some() != expected_paired {
            return Err(CoreError::MalformedAnimation {
                animation: self.name.clone(),
                states: self.states.len() + 1,
                transitions: self.transitions.len() + usize::from(transition.is_some()),
            });
        }
        if let Some(t) = transition {
            self.transitions.insert(index.saturating_sub(1), check_transition(t)?);
        }
        self.states.insert(index, state);
        Ok(())
    }

    /// Sets the time into state `index` and returns the previous one.
    pub fn change_transition_time(&mut self, index: usize, value: f64) -> Result<f64> {
        check_index(Collection::States, index, self.states.len())?;
        if index == 0 {
            return Err(CoreError::FirstStateHasNoTransition);
        }
        let value = check_transition(value)?;
        Ok(std::mem::replace(&mut self.transitions[index - 1], value))
    }

    /// Binds the animation and every state in it to `skeleton`.
    pub fn set_skeleton(&mut self, skeleton: Option<&Skeleton>) {
        self.rebind(skeleton.map(|s| s.name().to_string()));
    }

    pub(crate) fn rebind(&mut self, skeleton_name: Option<String>) {
        for state in &mut self.states {
            state.set_skeleton(skeleton_name.clone());
        }
        self.skeleton_name = skeleton_name;
    }

    /// Recognizes `name` only.
    pub fn process_patch(&mut self, changes: &Patch) -> Result<Patch> {
        let mut inverse = Patch::new();
        match changes.text(Field::Name)? {
            Some(name) if name.is_empty() => {
                return Err(CoreError::InvalidPatchValue { field: "name", reason: "animation name must not be empty".into() });
            }
            Some(name) => {
                inverse.insert(Field::Name, PatchValue::Text(std::mem::replace(&mut self.name, name.to_string())));
            }
            None => {}
        }
        Ok(inverse)
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    /// Checks the transition count and state bindings of a record read from
    /// outside.
    /// Binds every state that names no skeleton to this animation's.
    /// States naming another skeleton are left for [`Self::validate`].
    pub(crate) fn bind_unbound_states(&mut self) {
        let Some(skeleton) = self.skeleton_name.as_deref() else { return };
        for state in self.states.iter_mut().filter(|s| s.skeleton_name().is_none()) {
            state.set_skeleton(Some(skeleton.to_string()));
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.transitions.len() != self.states.len().saturating_sub(1) {
            return Err(CoreError::MalformedAnimation {
                animation: self.name.clone(),
                states: self.states.len(),
                transitions: self.transitions.len(),
            });
        }
        for t in &self.transitions {
            check_transition(*t)?;
        }
        for state in &self.states {
            self.check_state(state)?;
        }
        Ok(())
    }
}
