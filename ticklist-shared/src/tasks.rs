/// Ownership-scoped task operations
///
/// Every function takes the caller's [`Principal`] and passes only its id to
/// the store. A task that does not exist and a task owned by someone else
/// both come back as [`TaskError::NotFound`].

use tracing::debug;
use validator::Validate;

use crate::auth::Principal;
use crate::models::task::{Task, TaskId};
use crate::store::{StoreError, TaskStore};
use crate::validation::{from_validation_errors, FieldError};

/// Longest accepted task title, in characters
pub const MAX_TITLE_LENGTH: usize = 100;

#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    /// Blank or overlong title
    #[error("Task is invalid ({} errors)", .0.len())]
    Invalid(Vec<FieldError>),

    #[error("Task not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Validate)]
struct NewTitle {
    #[validate(length(min = 1, max = 100, message = "Task title must be 1 to 100 characters long."))]
    title: String,
}

/// Creates an incomplete task owned by `principal`
pub async fn add<S, P>(store: &S, principal: &P, title: &str) -> Result<Task, TaskError>
where
    S: TaskStore + ?Sized,
    P: Principal + ?Sized,
{
    let input = NewTitle {
        title: title.trim().to_string(),
    };
    input
        .validate()
        .map_err(|errors| TaskError::Invalid(from_validation_errors(&errors)))?;

    let task = store.insert_task(principal.principal_id(), &input.title).await?;
    debug!(user_id = task.user_id, task_id = task.id, "Task added");

    Ok(task)
}

/// Tasks of `principal`, oldest first
pub async fn list<S, P>(store: &S, principal: &P) -> Result<Vec<Task>, TaskError>
where
    S: TaskStore + ?Sized,
    P: Principal + ?Sized,
{
    Ok(store.list_tasks(principal.principal_id()).await?)
}

pub async fn toggle_complete<S, P>(store: &S, principal: &P, id: TaskId) -> Result<Task, TaskError>
where
    S: TaskStore + ?Sized,
    P: Principal + ?Sized,
{
    let task = store
        .toggle_task(principal.principal_id(), id)
        .await?
        .ok_or(TaskError::NotFound)?;

    debug!(user_id = task.user_id, task_id = task.id, complete = task.complete, "Task toggled");
    Ok(task)
}

pub async fn remove<S, P>(store: &S, principal: &P, id: TaskId) -> Result<(), TaskError>
where
    S: TaskStore + ?Sized,
    P: Principal + ?Sized,
{
    let owner = principal.principal_id();
    if !store.delete_task(owner, id).await? {
        return Err(TaskError::NotFound);
    }

    debug!(user_id = owner, task_id = id, "Task removed");
    Ok(())
}
