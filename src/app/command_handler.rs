use crate::app::commands::AppCommand;
use crate::app::error::Result;
use crate::app::session::EditorSession;
use crate::history::command::*;
use tracing::debug;

pub struct CommandHandler;

impl CommandHandler {
    pub fn execute(session: &mut EditorSession, cmd: AppCommand) -> Result<()> {
        debug!(?cmd, "Executing app command");
        match cmd {
            AppCommand::Undo => { session.undo()?; }
            AppCommand::Redo => { session.redo()?; }
            AppCommand::Select(element) => session.commit(Box::new(SelectCommand::new(element)))?,
            AppCommand::Patch(changes) => session.commit(Box::new(PatchCommand::new(changes)))?,

            AppCommand::AddSkeleton(skeleton) => session.commit(Box::new(AddSkeletonCommand::new(skeleton)))?,
            AppCommand::RemoveSkeleton(index) => session.commit(Box::new(RemoveSkeletonCommand::new(index)))?,
            AppCommand::AddBone(bone) => session.commit(Box::new(AddBoneCommand::new(bone)))?,
            AppCommand::RemoveBone(index) => session.commit(Box::new(RemoveBoneCommand::new(index)))?,

            AppCommand::AddAnimation(animation) => session.commit(Box::new(AddAnimationCommand::new(animation)))?,
            AppCommand::RemoveAnimation(index) => session.commit(Box::new(RemoveAnimationCommand::new(index)))?,
            AppCommand::AddState(state, transition) => {
                let transition = transition.unwrap_or(session.project().settings().default_transition_time);
                session.commit(Box::new(AddStateCommand::new(state, transition)))?
            }
            AppCommand::UpdateState(index, state) => session.commit(Box::new(UpdateStateCommand::new(index, state)))?,
            AppCommand::RemoveState(index) => session.commit(Box::new(RemoveStateCommand::new(index)))?,
            AppCommand::ChangeTransition(index, value) => session.commit(Box::new(ChangeTransitionCommand::new(index, value)))?,
            AppCommand::ApplyState(index) => session.commit(Box::new(ApplyStateCommand::new(index)))?,

            AppCommand::RefreshViews => { session.project().update_views(); }
            AppCommand::SaveProject(dir) => session.save(&dir)?,
            AppCommand::LoadProject(dir) => session.load(&dir)?,
        }
        Ok(())
    }
}
