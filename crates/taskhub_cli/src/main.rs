//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `taskhub_core` linkage.
//! - Walk one gated lifecycle against an in-memory store.

use std::error::Error;

use taskhub_core::db::open_db_in_memory;
use taskhub_core::{
    CreateTaskRequest, Decision, Principal, RegisterUserRequest, SqliteStatusRepository,
    SqliteTaskRepository, SqliteUserRepository, StatusService, TaskService, UserService,
};

fn main() -> Result<(), Box<dyn Error>> {
    println!("taskhub_core version={}", taskhub_core::core_version());

    let mut conn = open_db_in_memory()?;

    let principal;
    let author_id;
    let status_id;
    {
        let users = UserService::new(SqliteUserRepository::try_new(&conn)?);
        let author = users.register(&RegisterUserRequest {
            handle: "probe".to_string(),
            first_name: "Smoke".to_string(),
            last_name: "Probe".to_string(),
        })?;
        author_id = author.id;
        principal = Principal::Authenticated(author.id);

        let statuses = StatusService::new(SqliteStatusRepository::try_new(&conn)?);
        status_id = statuses.create("New")?.id;
    }

    let task_id;
    {
        let mut tasks = TaskService::new(SqliteTaskRepository::try_new(&mut conn)?);
        task_id = tasks
            .create(
                author_id,
                &CreateTaskRequest {
                    name: "Wire up the probe".to_string(),
                    description: String::new(),
                    status_id,
                    executor_id: None,
                    label_ids: Vec::new(),
                },
            )?
            .id;
    }

    {
        let statuses = StatusService::new(SqliteStatusRepository::try_new(&conn)?);
        match statuses.delete(&principal, status_id)? {
            Decision::Redirect { message, .. } => println!("status in use: {message}"),
            other => println!("unexpected decision: {other:?}"),
        }
    }

    {
        let tasks = TaskService::new(SqliteTaskRepository::try_new(&mut conn)?);
        match tasks.delete(&principal, task_id)? {
            Decision::Proceed => println!("task deleted by author"),
            other => println!("unexpected decision: {other:?}"),
        }
    }

    {
        let statuses = StatusService::new(SqliteStatusRepository::try_new(&conn)?);
        match statuses.delete(&principal, status_id)? {
            Decision::Proceed => println!("status deleted once unused"),
            other => println!("unexpected decision: {other:?}"),
        }
    }

    Ok(())
}
