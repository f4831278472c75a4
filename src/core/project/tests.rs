use super::*;
use crate::core::view::{View, ViewResult};
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;

fn ivan() -> Skeleton {
    let mut s = Skeleton::named("Ivan");
    s.add_bone(Bone::circle(30.0, [150.0, 50.0]).with_name("Head"));
    s.add_bone(Bone::segment(100.0, 1.5, [150.0, 80.0]).with_name("Body"));
    s
}

fn project_with_walk() -> Project {
    let mut project = Project::new();
    project.add_skeleton(ivan()).unwrap();
    let mut walk = Animation::named("Walk", &ivan());
    walk.add_state(SkeletonState::for_skeleton("Ivan"), 1.0).unwrap();
    walk.add_state(SkeletonState::for_skeleton("Ivan").with_update(1, Patch::new().rotation(2.0)), 0.5).unwrap();
    project.add_animation(walk).unwrap();
    project
}

#[test]
fn test_duplicate_names_are_rejected() {
    let mut project = project_with_walk();
    let err = project.add_skeleton(Skeleton::named("Ivan")).unwrap_err();
    assert_eq!(err, CoreError::NameConflict { collection: Collection::Skeletons, name: "Ivan".into() });
    assert_eq!(project.number_of_skeletons(), 1);

    let err = project.add_animation(Animation::named("Walk", &ivan())).unwrap_err();
    assert!(matches!(err, CoreError::NameConflict { collection: Collection::Animations, .. }));
    assert_eq!(project.number_of_animations(), 1);
}

#[test]
fn test_animation_needs_known_skeleton() {
    let mut project = Project::new();
    let err = project.add_animation(Animation::named("Walk", &ivan())).unwrap_err();
    assert_eq!(err, CoreError::UnknownSkeleton("Ivan".into()));
    // unbound animations are allowed
    project.add_animation(Animation::new(None, Some("Draft".into()))).unwrap();
}

#[test]
fn test_remove_out_of_range_leaves_collections() {
    let mut project = project_with_walk();
    assert_eq!(
        project.remove_skeleton(3).unwrap_err(),
        CoreError::OutOfRange { collection: Collection::Skeletons, index: 3, count: 1 }
    );
    assert_eq!(
        project.remove_animation(1).unwrap_err(),
        CoreError::OutOfRange { collection: Collection::Animations, index: 1, count: 1 }
    );
    assert_eq!(project.number_of_skeletons(), 1);
    assert_eq!(project.number_of_animations(), 1);
}

#[test]
fn test_skeleton_in_use_cannot_be_removed() {
    let mut project = project_with_walk();
    let err = project.remove_skeleton(0).unwrap_err();
    assert_eq!(err, CoreError::SkeletonInUse { skeleton: "Ivan".into(), animation: "Walk".into() });
    project.remove_animation(0).unwrap();
    assert_eq!(project.remove_skeleton(0).unwrap().name(), "Ivan");
}

#[test]
fn test_set_active_element_validates() {
    let mut project = project_with_walk();
    let prev = project.set_active_element(ActiveElement::Bone { skeleton: 0, bone: 1 }).unwrap();
    assert_eq!(prev, ActiveElement::Project);
    assert_eq!(project.active_bone().and_then(Bone::name), Some("Body"));
    assert_eq!(project.active_skeleton().map(Skeleton::name), Some("Ivan"));

    assert!(project.set_active_element(ActiveElement::Bone { skeleton: 0, bone: 2 }).is_err());
    assert!(project.set_active_element(ActiveElement::State { animation: 0, state: 5 }).is_err());
    assert_eq!(project.active_element(), ActiveElement::Bone { skeleton: 0, bone: 1 });
}

#[test]
fn test_patch_active_bone_and_inverse() {
    let mut project = project_with_walk();
    project.set_active_element(ActiveElement::Bone { skeleton: 0, bone: 0 }).unwrap();
    let inverse = project.patch_active(&Patch::new().radius(12.0)).unwrap();
    assert_eq!(inverse, Patch::new().radius(30.0));
    project.patch_active(&inverse).unwrap();
    assert_eq!(project.get_skeleton(0).unwrap(), &ivan());
}

#[test]
fn test_skeleton_rename_rebinds_animations() {
    let mut project = project_with_walk();
    project.add_skeleton(Skeleton::named("Boris")).unwrap();

    let err = project.patch_element(&ActiveElement::Skeleton(0), &Patch::new().name("Boris")).unwrap_err();
    assert!(matches!(err, CoreError::NameConflict { .. }));
    assert_eq!(project.get_skeleton(0).unwrap().name(), "Ivan");

    let inverse = project.patch_element(&ActiveElement::Skeleton(0), &Patch::new().name("Vanya")).unwrap();
    assert_eq!(inverse, Patch::new().name("Ivan"));
    let walk = project.get_animation(0).unwrap();
    assert_eq!(walk.skeleton_name(), Some("Vanya"));
    assert!(walk.states().iter().all(|s| s.skeleton_name() == Some("Vanya")));

    // renaming to itself is not a conflict
    project.patch_element(&ActiveElement::Skeleton(0), &Patch::new().name("Vanya")).unwrap();
}

#[test]
fn test_animation_rename_checks_uniqueness() {
    let mut project = project_with_walk();
    project.add_animation(Animation::new(None, Some("Run".into()))).unwrap();
    assert!(project.patch_element(&ActiveElement::Animation(1), &Patch::new().name("Walk")).is_err());
    let inverse = project.patch_element(&ActiveElement::Animation(1), &Patch::new().name("Sprint")).unwrap();
    assert_eq!(inverse, Patch::new().name("Run"));
}

#[test]
fn test_state_and_project_patches_are_empty() {
    let mut project = project_with_walk();
    let target = ActiveElement::State { animation: 0, state: 1 };
    assert!(project.patch_element(&target, &Patch::new().name("x")).unwrap().is_empty());
    assert!(project.patch_element(&ActiveElement::Project, &Patch::new().name("x")).unwrap().is_empty());
    assert!(project.patch_element(&ActiveElement::State { animation: 0, state: 2 }, &Patch::new()).is_err());
}

#[test]
fn test_active_index_follows_removals() {
    let mut project = project_with_walk();
    project.add_bone(0, Bone::circle(1.0, [0.0, 0.0])).unwrap();
    project.set_active_element(ActiveElement::Bone { skeleton: 0, bone: 2 }).unwrap();

    let removed = project.remove_bone(0, 0).unwrap();
    assert_eq!(project.active_element(), ActiveElement::Bone { skeleton: 0, bone: 1 });
    project.insert_bone(0, 0, removed).unwrap();
    assert_eq!(project.active_element(), ActiveElement::Bone { skeleton: 0, bone: 2 });

    project.remove_bone(0, 2).unwrap();
    assert_eq!(project.active_element(), ActiveElement::Skeleton(0));

    project.set_active_element(ActiveElement::State { animation: 0, state: 1 }).unwrap();
    project.remove_state(0, 1).unwrap();
    assert_eq!(project.active_element(), ActiveElement::Animation(0));
    project.remove_animation(0).unwrap();
    assert_eq!(project.active_element(), ActiveElement::Project);
}

#[test]
fn test_apply_pose_returns_restoring_pose() {
    let mut project = project_with_walk();
    let pose = project.get_animation(0).unwrap().get_state(1).unwrap().clone();
    let restore = project.apply_pose(&pose).unwrap();
    let Bone::Segment(body) = project.get_skeleton(0).unwrap().get_bone(1).unwrap() else { unreachable!() };
    assert_eq!(body.rotation, 2.0);
    project.apply_pose(&restore).unwrap();
    assert_eq!(project.get_skeleton(0).unwrap(), &ivan());

    assert_eq!(project.apply_pose(&SkeletonState::default()), Err(CoreError::UnboundState));
    assert_eq!(
        project.apply_pose(&SkeletonState::for_skeleton("Nobody")),
        Err(CoreError::UnknownSkeleton("Nobody".into()))
    );
}

struct Counter(Rc<RefCell<Vec<ModelEvent>>>);

impl View for Counter {
    fn on_model_changed(&mut self, project: &Project, event: &ModelEvent) -> ViewResult {
        assert!(project.number_of_skeletons() <= 1);
        self.0.borrow_mut().push(event.clone());
        Ok(())
    }
}

#[test]
fn test_replace_contents_broadcasts_loaded() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut project = project_with_walk();
    project.register_view(Rc::new(RefCell::new(Counter(seen.clone()))));
    project.set_active_element(ActiveElement::Skeleton(0)).unwrap();

    project.replace_contents(vec![ivan()], Vec::new());
    assert_eq!(project.active_element(), ActiveElement::Project);
    assert_eq!(project.number_of_animations(), 0);
    assert_eq!(project.update_views(), 1);
    assert_eq!(*seen.borrow(), vec![ModelEvent::Loaded, ModelEvent::Refresh]);
}

#[test]
fn test_snapshot_shape() {
    let project = project_with_walk();
    let snap = project.snapshot();
    assert_eq!(snap["skeletons"][0]["name"], "Ivan");
    assert_eq!(snap["animations"][0]["transitions"], serde_json::json!([0.5]));
    assert_eq!(snap["active"], serde_json::json!({"kind": "project"}));
}
