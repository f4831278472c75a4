use super::error::{FormatError, Result};
use crate::core::animation::skeleton::Skeleton;
use crate::core::animation::timeline::Animation;
use crate::core::project::Project;
use crate::core::settings::ProjectSettings;
use serde::Serialize;
use std::fs;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const EXTENSION: &str = "json";

/// On-disk layout of a project:
///
/// ```text
/// <root>/skeletons/<name>.json
/// <root>/animations/<name>.json
/// ```
#[derive(Debug, Clone)]
pub struct ProjectDir {
    root: PathBuf,
    skeletons: PathBuf,
    animations: PathBuf,
}

impl ProjectDir {
    pub fn new(root: impl Into<PathBuf>, settings: &ProjectSettings) -> Self {
        let root = root.into();
        Self {
            skeletons: root.join(&settings.skeletons_dir),
            animations: root.join(&settings.animations_dir),
            root,
        }
    }

    pub fn root(&self) -> &Path { &self.root }

    pub fn skeleton_path(&self, name: &str) -> PathBuf {
        self.skeletons.join(format!("{name}.{EXTENSION}"))
    }

    pub fn animation_path(&self, name: &str) -> PathBuf {
        self.animations.join(format!("{name}.{EXTENSION}"))
    }

    /// Reads one skeleton file. The file stem wins over any name stored
    /// inside the record, and unnamed bones get their default names. Bone
    /// values must lie in the ranges a patch would accept.
    pub fn read_skeleton(&self, name: &str) -> Result<Skeleton> {
        let mut skeleton: Skeleton = read_json(&self.skeleton_path(name), "skeleton", name)?;
        skeleton.set_name(name.to_string());
        skeleton.validate()?;
        skeleton.fill_default_names();
        Ok(skeleton)
    }

    /// Reads one animation file; `is_known` decides whether the skeleton it
    /// names exists. States stored without a skeleton are bound to the
    /// animation's.
    pub fn read_animation(&self, name: &str, is_known: impl Fn(&str) -> bool) -> Result<Animation> {
        let mut animation: Animation = read_json(&self.animation_path(name), "animation", name)?;
        animation.set_name(name.to_string());
        if let Some(skeleton) = animation.skeleton_name() {
            if !is_known(skeleton) {
                return Err(FormatError::UnknownSkeleton { animation: name.to_string(), skeleton: skeleton.to_string() });
            }
        }
        animation.bind_unbound_states();
        animation.validate()?;
        Ok(animation)
    }

    /// Replaces `skeleton` with the file of the same name. On any failure
    /// the in-memory skeleton is left as it was.
    pub fn reload_skeleton(&self, skeleton: &mut Skeleton) -> Result<()> {
        *skeleton = self.read_skeleton(skeleton.name())?;
        Ok(())
    }

    pub fn reload_animation(&self, animation: &mut Animation, is_known: impl Fn(&str) -> bool) -> Result<()> {
        *animation = self.read_animation(animation.name(), is_known)?;
        Ok(())
    }

    /// Replaces the project's skeletons and animations with the directory's
    /// contents. Nothing in `project` changes unless every file loads.
    pub fn load_into(&self, project: &mut Project) -> Result<()> {
        if !self.root.is_dir() {
            return Err(FormatError::NotFound { kind: "project", name: self.root.display().to_string() });
        }
        let skeletons = list_stems(&self.skeletons)?
            .iter()
            .map(|name| self.read_skeleton(name))
            .collect::<Result<Vec<_>>>()?;
        let animations = list_stems(&self.animations)?
            .iter()
            .map(|name| self.read_animation(name, |s| skeletons.iter().any(|k| k.name() == s)))
            .collect::<Result<Vec<_>>>()?;

        info!(dir = %self.root.display(), skeletons = skeletons.len(), animations = animations.len(), "Project loaded");
        project.replace_contents(skeletons, animations);
        Ok(())
    }

    pub fn load(&self, settings: ProjectSettings) -> Result<Project> {
        let mut project = Project::with_settings(settings);
        self.load_into(&mut project)?;
        Ok(project)
    }

    /// Writes every skeleton and animation, replacing whatever the entity
    /// directories held. The whole project is checked first so a rejected
    /// save leaves the disk untouched.
    pub fn save(&self, project: &Project) -> Result<()> {
        for skeleton in project.skeletons() {
            check_name("skeleton", skeleton.name())?;
            if skeleton.is_empty() {
                return Err(FormatError::EmptySkeleton(skeleton.name().to_string()));
            }
        }
        for animation in project.animations() {
            check_name("animation", animation.name())?;
            if animation.number_of_states() == 0 {
                return Err(FormatError::EmptyAnimation(animation.name().to_string()));
            }
        }

        recreate_dir(&self.skeletons)?;
        recreate_dir(&self.animations)?;
        for skeleton in project.skeletons() {
            write_json(&self.skeleton_path(skeleton.name()), skeleton)?;
        }
        for animation in project.animations() {
            write_json(&self.animation_path(animation.name()), animation)?;
        }
        info!(
            dir = %self.root.display(),
            skeletons = project.number_of_skeletons(),
            animations = project.number_of_animations(),
            "Project saved"
        );
        Ok(())
    }
}

/// Names become file names, so they must be non-empty and free of path
/// separators.
fn check_name(kind: &'static str, name: &str) -> Result<()> {
    if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(FormatError::InvalidName { kind, name: name.to_string() });
    }
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, kind: &'static str, name: &str) -> Result<T> {
    let file = match fs::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(FormatError::NotFound { kind, name: name.to_string() });
        }
        Err(e) => return Err(e.into()),
    };
    debug!(path = %path.display(), kind, "Reading record");
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut writer = BufWriter::new(fs::File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    debug!(path = %path.display(), "Record written");
    Ok(())
}

fn recreate_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir)?;
    }
    fs::create_dir_all(dir)?;
    Ok(())
}

/// Sorted stems of the `.json` files in `dir`. A missing directory holds
/// nothing.
fn list_stems(dir: &Path) -> Result<Vec<String>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    let mut stems = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            stems.push(stem.to_string());
        }
    }
    stems.sort();
    Ok(stems)
}

#[cfg(test)]
mod tests;
