/// The signed-in user's task list
///
/// # Endpoints
///
/// - `GET|POST /tasks`   - List view
/// - `POST /add`         - Create a task from field `title`
/// - `GET /update/:id`   - Toggle completion
/// - `GET /delete/:id`   - Delete
///
/// Every handler runs the access guard first. Anonymous requests are
/// redirected to `/sign-in` before anything is read or written. Tasks are
/// always addressed through the guard's user, so another user's task id
/// yields 404 exactly like a missing one.

use axum::{
    extract::{rejection::FormRejection, Path, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::{Deserialize, Serialize};
use ticklist_shared::{
    models::task::{Task, TaskId},
    tasks::{self, TaskError},
};

use super::page;
use crate::{
    app::AppState,
    cookies,
    error::ApiResult,
    session::{redirect_to_sign_in, require_user, Access, CurrentSession},
};

/// Task list view
#[derive(Debug, Serialize)]
pub struct TasksView {
    /// Display name of the owner
    pub name: String,

    /// Owner's tasks in creation order
    pub tasks: Vec<Task>,

    pub flash: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AddTaskForm {
    pub title: String,
}

/// Unparsable ids are treated like ids of someone else's task
fn parse_task_id(raw: &str) -> Result<TaskId, TaskError> {
    raw.parse().map_err(|_| TaskError::NotFound)
}

pub async fn list_tasks(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let user = match require_user(&state, &session).await? {
        Access::Allow(user) => user,
        Access::Deny => return Ok(redirect_to_sign_in()),
    };

    let tasks = tasks::list(state.store.as_ref(), &user).await?;
    let flash = cookies::read_flash(&headers);
    let flash_shown = flash.is_some();

    Ok(page(
        TasksView {
            name: user.name,
            tasks,
            flash,
        },
        flash_shown,
    ))
}

/// Creates a task
///
/// # Errors
///
/// - `400 Bad Request`: Body is not a urlencoded form
/// - `422 Unprocessable Entity`: Blank or overlong title
pub async fn add_task(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    form: Result<Form<AddTaskForm>, FormRejection>,
) -> ApiResult<Response> {
    let user = match require_user(&state, &session).await? {
        Access::Allow(user) => user,
        Access::Deny => return Ok(redirect_to_sign_in()),
    };

    // The body is only looked at once the guard has let the request through.
    let Form(form) = form?;

    tasks::add(state.store.as_ref(), &user, &form.title).await?;

    Ok(Redirect::to("/tasks").into_response())
}

/// Flips a task between complete and incomplete
///
/// # Errors
///
/// - `404 Not Found`: No such task among the user's tasks
pub async fn toggle_task(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let user = match require_user(&state, &session).await? {
        Access::Allow(user) => user,
        Access::Deny => return Ok(redirect_to_sign_in()),
    };

    tasks::toggle_complete(state.store.as_ref(), &user, parse_task_id(&id)?).await?;

    Ok(Redirect::to("/tasks").into_response())
}

/// Deletes a task
///
/// # Errors
///
/// - `404 Not Found`: No such task among the user's tasks
pub async fn delete_task(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let user = match require_user(&state, &session).await? {
        Access::Allow(user) => user,
        Access::Deny => return Ok(redirect_to_sign_in()),
    };

    tasks::remove(state.store.as_ref(), &user, parse_task_id(&id)?).await?;

    Ok(Redirect::to("/tasks").into_response())
}
