use thiserror::Error;

use crate::binder::BindError;
use crate::pager::PagerError;
use crate::scene::SceneId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CutsceneError {
    #[error(transparent)]
    Pager(#[from] PagerError),
    #[error(transparent)]
    Bind(#[from] BindError),
    #[error("no scene can be built for {0}")]
    NoScene(SceneId),
}
