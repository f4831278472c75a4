use crate::core::animation::bone::Bone;
use crate::core::animation::skeleton::Skeleton;
use crate::core::animation::state::SkeletonState;
use crate::core::animation::timeline::Animation;
use crate::core::patch::Patch;
use crate::core::project::ActiveElement;
use std::path::PathBuf;

/// User intents. Edits become history commands; bone and state indices are
/// relative to the active skeleton or animation.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Undo,
    Redo,
    Select(ActiveElement),
    Patch(Patch),
    AddSkeleton(Skeleton),
    RemoveSkeleton(usize),
    AddBone(Bone),
    RemoveBone(usize),
    AddAnimation(Animation),
    RemoveAnimation(usize),
    /// `None` uses the project's default transition time.
    AddState(SkeletonState, Option<f64>),
    UpdateState(usize, SkeletonState),
    RemoveState(usize),
    ChangeTransition(usize, f64),
    ApplyState(usize),
    RefreshViews,
    SaveProject(PathBuf),
    LoadProject(PathBuf),
}
