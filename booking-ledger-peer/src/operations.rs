mod commit_status;
mod endorse;
mod evaluate;
mod submit;

pub(crate) use commit_status::CommitStatus;
pub(crate) use endorse::Endorse;
pub(crate) use evaluate::Evaluate;
pub(crate) use submit::Submit;
