use super::*;
use crate::core::animation::bone::Bone;
use crate::core::animation::state::SkeletonState;
use crate::core::error::CoreError;
use crate::core::patch::Patch;
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;

fn sample_project() -> Project {
    let mut ivan = Skeleton::named("Ivan");
    ivan.add_bone(Bone::circle(30.0, [150.0, 50.0]).with_name("Head"));
    ivan.add_bone(Bone::segment(100.0, 1.5, [150.0, 80.0]));
    let mut walk = Animation::named("Walk", &ivan);
    walk.add_state(SkeletonState::for_skeleton("Ivan"), 1.0).unwrap();
    walk.add_state(SkeletonState::for_skeleton("Ivan").with_update(1, Patch::new().rotation(2.0)), 0.5).unwrap();

    let mut project = Project::new();
    project.add_skeleton(ivan).unwrap();
    project.add_animation(walk).unwrap();
    project
}

fn dir(tmp: &TempDir) -> ProjectDir {
    ProjectDir::new(tmp.path(), &ProjectSettings::default())
}

fn write(path: PathBuf, value: serde_json::Value) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, value.to_string()).unwrap();
}

#[test]
fn test_save_then_load_restores_project() {
    let tmp = TempDir::new().unwrap();
    let project_dir = dir(&tmp);
    let project = sample_project();
    project_dir.save(&project).unwrap();

    assert!(project_dir.skeleton_path("Ivan").is_file());
    assert!(project_dir.animation_path("Walk").is_file());

    let loaded = project_dir.load(ProjectSettings::default()).unwrap();
    assert_eq!(loaded.snapshot(), project.snapshot());
}

#[test]
fn test_skeleton_file_shape() {
    let tmp = TempDir::new().unwrap();
    let project_dir = dir(&tmp);
    project_dir.save(&sample_project()).unwrap();
    let text = fs::read_to_string(project_dir.skeleton_path("Ivan")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["bones"][1]["name"], "Ivan_bone_1");
    assert_eq!(value["bones"][1]["type"], "SEGMENT");
    assert_eq!(value["bones"][0]["radius"], 30.0);
    // pretty printed
    assert!(text.contains("\n  \"bones\""));
}

#[test]
fn test_save_rejects_empty_entities_before_touching_disk() {
    let tmp = TempDir::new().unwrap();
    let project_dir = dir(&tmp);
    project_dir.save(&sample_project()).unwrap();

    let mut project = sample_project();
    project.add_skeleton(Skeleton::named("Empty")).unwrap();
    let err = project_dir.save(&project).unwrap_err();
    assert!(matches!(err, FormatError::EmptySkeleton(ref name) if name == "Empty"));

    let mut project = sample_project();
    project.add_animation(Animation::named("Idle", &Skeleton::named("Ivan"))).unwrap();
    assert!(matches!(project_dir.save(&project), Err(FormatError::EmptyAnimation(_))));

    // the earlier save is still there
    assert!(project_dir.skeleton_path("Ivan").is_file());
    assert!(!project_dir.skeleton_path("Empty").exists());
}

#[test]
fn test_save_replaces_stale_files() {
    let tmp = TempDir::new().unwrap();
    let project_dir = dir(&tmp);
    write(project_dir.skeleton_path("Stale"), json!({"name": "Stale", "bones": []}));
    project_dir.save(&sample_project()).unwrap();
    assert!(!project_dir.skeleton_path("Stale").exists());
}

#[test]
fn test_load_names_from_file_stems_in_sorted_order() {
    let tmp = TempDir::new().unwrap();
    let project_dir = dir(&tmp);
    let bone = json!({"type": "CIRCLE", "position": [0, 0], "color": [0, 0, 0], "thickness": 1.0, "radius": 3.0});
    write(project_dir.skeleton_path("b"), json!({"name": "ignored", "bones": [bone.clone()]}));
    write(project_dir.skeleton_path("a"), json!({"bones": [bone]}));
    fs::write(tmp.path().join("skeletons").join("notes.txt"), "not a record").unwrap();

    let project = project_dir.load(ProjectSettings::default()).unwrap();
    let names: Vec<&str> = project.skeletons().iter().map(Skeleton::name).collect();
    assert_eq!(names, vec!["a", "b"]);
    assert_eq!(project.get_skeleton(1).unwrap().get_bone(0).unwrap().name(), Some("b_bone_0"));
}

#[test]
fn test_load_rejects_unknown_skeleton() {
    let tmp = TempDir::new().unwrap();
    let project_dir = dir(&tmp);
    write(project_dir.animation_path("Walk"), json!({
        "name": "Walk",
        "skeleton_name": "Ghost",
        "states": [{"skeleton_name": "Ghost", "bone_updates": {}}],
        "transitions": [],
    }));
    let err = project_dir.load(ProjectSettings::default()).unwrap_err();
    assert!(matches!(err, FormatError::UnknownSkeleton { ref skeleton, .. } if skeleton == "Ghost"));
}

#[test]
fn test_states_without_skeleton_bind_to_animation() {
    let tmp = TempDir::new().unwrap();
    let project_dir = dir(&tmp);
    project_dir.save(&sample_project()).unwrap();
    write(project_dir.animation_path("Nod"), json!({
        "skeleton_name": "Ivan",
        "states": [{"bone_updates": {}}, {"bone_updates": {"0": {"radius": 5.0}}}],
        "transitions": [0.5],
    }));

    let project = project_dir.load(ProjectSettings::default()).unwrap();
    let nod = project.animation_by_name("Nod").unwrap();
    assert_eq!(nod.states(), &[
        SkeletonState::for_skeleton("Ivan"),
        SkeletonState::for_skeleton("Ivan").with_update(0, Patch::new().radius(5.0)),
    ]);
}

#[test]
fn test_state_naming_other_skeleton_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let project_dir = dir(&tmp);
    project_dir.save(&sample_project()).unwrap();
    write(project_dir.skeleton_path("Olga"), json!({
        "bones": [{"type": "CIRCLE", "position": [0, 0], "color": [0, 0, 0], "thickness": 1.0, "radius": 3.0}],
    }));
    write(project_dir.animation_path("Nod"), json!({
        "skeleton_name": "Ivan",
        "states": [{"bone_updates": {}}, {"skeleton_name": "Olga", "bone_updates": {}}],
        "transitions": [0.5],
    }));
    let err = project_dir.load(ProjectSettings::default()).unwrap_err();
    assert!(matches!(err, FormatError::Core(CoreError::SkeletonMismatch { .. })));
}

#[test]
fn test_bone_values_out_of_range_are_rejected() {
    let tmp = TempDir::new().unwrap();
    let project_dir = dir(&tmp);
    for (name, bone) in [
        ("Thin", json!({"type": "CIRCLE", "position": [0, 0], "color": [0, 0, 0], "thickness": 0.0, "radius": 3.0})),
        ("Hollow", json!({"type": "CIRCLE", "position": [0, 0], "color": [0, 0, 0], "thickness": 1.0, "radius": -3.0})),
        ("Short", json!({"type": "SEGMENT", "position": [0, 0], "color": [0, 0, 0], "thickness": 1.0, "length": -1.0, "rotation": 0.0})),
    ] {
        write(project_dir.skeleton_path(name), json!({"bones": [bone]}));
        let err = project_dir.read_skeleton(name).unwrap_err();
        assert!(matches!(err, FormatError::Core(CoreError::InvalidPatchValue { .. })), "{name}: {err}");
        fs::remove_file(project_dir.skeleton_path(name)).unwrap();
    }
}

#[test]
fn test_load_rejects_malformed_animation() {
    let tmp = TempDir::new().unwrap();
    let project_dir = dir(&tmp);
    project_dir.save(&sample_project()).unwrap();
    write(project_dir.animation_path("Walk"), json!({
        "skeleton_name": "Ivan",
        "states": [{"skeleton_name": "Ivan", "bone_updates": {}}],
        "transitions": [1.0, 2.0],
    }));
    let mut project = sample_project();
    let before = project.snapshot();
    let err = project_dir.load_into(&mut project).unwrap_err();
    assert!(matches!(err, FormatError::Core(CoreError::MalformedAnimation { .. })));
    assert_eq!(project.snapshot(), before);
}

#[test]
fn test_missing_skeleton_file_leaves_skeleton_untouched() {
    let tmp = TempDir::new().unwrap();
    let project_dir = dir(&tmp);
    let mut skeleton = Skeleton::named("Nobody");
    skeleton.add_bone(Bone::circle(1.0, [0.0, 0.0]));
    let before = skeleton.clone();

    let err = project_dir.reload_skeleton(&mut skeleton).unwrap_err();
    assert!(matches!(err, FormatError::NotFound { kind: "skeleton", ref name } if name == "Nobody"));
    assert!(err.to_string().contains("Nobody"));
    assert_eq!(skeleton, before);
}

#[test]
fn test_reload_animation_checks_skeleton() {
    let tmp = TempDir::new().unwrap();
    let project_dir = dir(&tmp);
    let project = sample_project();
    project_dir.save(&project).unwrap();

    let mut walk = Animation::named("Walk", &Skeleton::named("Ivan"));
    project_dir.reload_animation(&mut walk, |s| project.has_skeleton(s)).unwrap();
    assert_eq!(walk.number_of_states(), 2);

    let mut walk = Animation::named("Walk", &Skeleton::named("Ivan"));
    assert!(project_dir.reload_animation(&mut walk, |_| false).is_err());
    assert_eq!(walk.number_of_states(), 0);
}

#[test]
fn test_missing_project_root() {
    let tmp = TempDir::new().unwrap();
    let project_dir = ProjectDir::new(tmp.path().join("absent"), &ProjectSettings::default());
    assert!(matches!(project_dir.load(ProjectSettings::default()), Err(FormatError::NotFound { kind: "project", .. })));
}

#[test]
fn test_names_that_are_not_file_names_are_rejected() {
    let tmp = TempDir::new().unwrap();
    let mut project = sample_project();
    project.skeleton_mut(0).unwrap().set_name("../escape".into());
    let err = dir(&tmp).save(&project).unwrap_err();
    assert!(matches!(err, FormatError::InvalidName { kind: "skeleton", .. }));
}

#[test]
fn test_load_broadcasts_loaded() {
    use crate::core::view::{ModelEvent, View, ViewResult};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Seen(Vec<ModelEvent>);
    impl View for Seen {
        fn on_model_changed(&mut self, project: &Project, event: &ModelEvent) -> ViewResult {
            assert_eq!(project.number_of_skeletons(), 1);
            self.0.push(event.clone());
            Ok(())
        }
    }

    let tmp = TempDir::new().unwrap();
    let project_dir = dir(&tmp);
    project_dir.save(&sample_project()).unwrap();

    let seen = Rc::new(RefCell::new(Seen(Vec::new())));
    let mut project = Project::new();
    project.register_view(seen.clone());
    project_dir.load_into(&mut project).unwrap();
    assert_eq!(seen.borrow().0, vec![ModelEvent::Loaded]);
}
