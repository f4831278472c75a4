use rust_i18n::t;

/// Which ordered collection an index was checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Bones,
    States,
    Skeletons,
    Animations,
}

impl Collection {
    fn key(self) -> &'static str {
        match self {
            Collection::Bones => "collection.bones",
            Collection::States => "collection.states",
            Collection::Skeletons => "collection.skeletons",
            Collection::Animations => "collection.animations",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CoreError {
    OutOfRange { collection: Collection, index: usize, count: usize },
    NameConflict { collection: Collection, name: String },
    SkeletonMismatch { expected: String, found: Option<String> },
    NoSkeleton { animation: String },
    UnboundState,
    UnknownSkeleton(String),
    InvalidPatchValue { field: &'static str, reason: String },
    FirstStateHasNoTransition,
    MalformedAnimation { animation: String, states: usize, transitions: usize },
    SkeletonInUse { skeleton: String, animation: String },
    InactiveElement(String),
    NotApplied(String),
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoreError::OutOfRange { collection, index, count } => write!(f, "{}", t!(
                "error.out_of_range",
                collection = t!(collection.key()),
                index = index,
                count = count
            )),
            CoreError::NameConflict { collection, name } => write!(f, "{}", t!(
                "error.name_conflict",
                collection = t!(collection.key()),
                name = name
            )),
            CoreError::SkeletonMismatch { expected, found } => write!(f, "{}", t!(
                "error.skeleton_mismatch",
                expected = expected,
                found = found.as_deref().unwrap_or("-")
            )),
            CoreError::NoSkeleton { animation } => write!(f, "{}", t!("error.no_skeleton", animation = animation)),
            CoreError::UnboundState => write!(f, "{}", t!("error.unbound_state")),
            CoreError::UnknownSkeleton(name) => write!(f, "{}", t!("error.unknown_skeleton", name = name)),
            CoreError::InvalidPatchValue { field, reason } => write!(f, "{}", t!("error.invalid_patch_value", field = field, reason = reason)),
            CoreError::FirstStateHasNoTransition => write!(f, "{}", t!("error.first_state_transition")),
            CoreError::MalformedAnimation { animation, states, transitions } => write!(f, "{}", t!(
                "error.malformed_animation",
                animation = animation,
                states = states,
                transitions = transitions
            )),
            CoreError::SkeletonInUse { skeleton, animation } => write!(f, "{}", t!(
                "error.skeleton_in_use",
                skeleton = skeleton,
                animation = animation
            )),
            CoreError::InactiveElement(what) => write!(f, "{}", t!("error.inactive_element", what = what)),
            CoreError::NotApplied(label) => write!(f, "{}", t!("error.not_applied", label = label)),
        }
    }
}

impl std::error::Error for CoreError {}
pub type Result<T> = std::result::Result<T, CoreError>;

pub(crate) fn check_index(collection: Collection, index: usize, count: usize) -> Result<()> {
    if index < count { Ok(()) } else { Err(CoreError::OutOfRange { collection, index, count }) }
}
