use crate::app::{action::Action, command::Command, session::Session, slash};
use crate::domain::{
    availability::{format_weekly_free_time, free_time_from},
    codec::RecordForm,
    models::{Record, RecordQuery, RecordSort},
    query::status_filter,
    store::Properties,
};
use crate::error::Result;
use anyhow::Result as AnyResult;
use futures::FutureExt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

pub fn handle_command(
    command: Command,
    session: Arc<Session>,
    tx: mpsc::Sender<Action>,
) -> AnyResult<()> {
    debug!(?command, "running effect");
    match command {
        Command::LoadFreeTime { start, end } => {
            tokio::spawn(async move {
                run_operation(
                    tx,
                    "Analyzing free time...",
                    "Error analyzing free time",
                    move || async move {
                        let range = session
                            .call(move |store| {
                                async move { store.query_events_in_range(start, end).await }
                                    .boxed()
                            })
                            .await?;
                        debug!(
                            property = %range.date_property,
                            count = range.events.len(),
                            "loaded events"
                        );
                        let analysis = free_time_from(start, &range.events, session.working_hours);
                        Ok(vec![Action::Reply(format!(
                            "Free time for next week:\n{}",
                            format_weekly_free_time(&analysis)
                        ))])
                    },
                )
                .await;
            });
        }
        Command::QueryTasks(status) => {
            tokio::spawn(async move {
                run_operation(
                    tx,
                    "Fetching tasks...",
                    "Error fetching tasks",
                    move || async move {
                        let filter = status.clone();
                        let records = session
                            .call(move |store| {
                                let status = filter.clone();
                                async move {
                                    let schema = store.get_schema().await?;
                                    let query = RecordQuery {
                                        filter: Some(status_filter(&schema, &status)?),
                                        sort: Some(RecordSort::newest_first()),
                                        limit: None,
                                    };
                                    store.query_records(query).await
                                }
                                .boxed()
                            })
                            .await?;
                        Ok(vec![Action::Reply(format!(
                            "Tasks with status \"{status}\":\n{}",
                            slash::format_task_list(&records)
                        ))])
                    },
                )
                .await;
            });
        }
        Command::CreateTitled(title) => {
            tokio::spawn(async move {
                run_operation(
                    tx,
                    "Creating entry...",
                    "Error creating entry",
                    move || async move {
                        let codec = session.codec.clone();
                        let name = title.clone();
                        session
                            .call(move |store| {
                                let codec = codec.clone();
                                let name = name.clone();
                                async move {
                                    let schema = store.get_schema().await?;
                                    let record = codec.titled(&schema, &name);
                                    store.create_record(record.properties).await
                                }
                                .boxed()
                            })
                            .await?;
                        Ok(vec![Action::Reply(format!("✓ Created: {title}"))])
                    },
                )
                .await;
            });
        }
        Command::OpenDraft => {
            tokio::spawn(async move {
                run_operation(
                    tx,
                    "Loading schema...",
                    "Error creating entry",
                    move || async move {
                        let schema = fetch_schema(&session).await?;
                        let form = RecordForm::hydrate(&session.codec, &Record::draft(), &schema)?;
                        let mut actions = unsupported_notice(&form);
                        actions.push(Action::DraftReady { form, schema });
                        Ok(actions)
                    },
                )
                .await;
            });
        }
        Command::LoadRecent => {
            tokio::spawn(async move {
                run_operation(
                    tx,
                    "Fetching entries...",
                    "Error fetching entries",
                    move || async move {
                        let limit = session.recent_limit;
                        let records = session
                            .call(move |store| {
                                async move {
                                    store
                                        .query_records(RecordQuery {
                                            filter: None,
                                            sort: Some(RecordSort::newest_first()),
                                            limit: Some(limit),
                                        })
                                        .await
                                }
                                .boxed()
                            })
                            .await?;
                        Ok(vec![Action::RecordsLoaded(records)])
                    },
                )
                .await;
            });
        }
        Command::EditRecord { message_id, record } => {
            tokio::spawn(async move {
                run_operation(
                    tx,
                    "Loading schema...",
                    "Error",
                    move || async move {
                        let schema = fetch_schema(&session).await?;
                        let form = RecordForm::hydrate(&session.codec, &record, &schema)?;
                        let mut actions = unsupported_notice(&form);
                        actions.push(Action::EditorReady {
                            message_id,
                            form,
                            schema,
                        });
                        Ok(actions)
                    },
                )
                .await;
            });
        }
        Command::SaveRecord {
            message_id,
            form,
            schema,
        } => {
            tokio::spawn(async move {
                run_operation(
                    tx,
                    "Saving entry...",
                    "Error",
                    move || async move {
                        let record = form.submit(&session.codec, &schema)?;
                        let created = record.is_new || record.id.is_none();
                        let id = record.id.clone();
                        let properties: Properties = record.properties;
                        let saved = session
                            .call(move |store| {
                                let id = id.clone();
                                let properties = properties.clone();
                                async move {
                                    match id {
                                        Some(id) if !created => {
                                            store.update_record(&id, properties).await
                                        }
                                        _ => store.create_record(properties).await,
                                    }
                                }
                                .boxed()
                            })
                            .await?;
                        Ok(vec![Action::RecordSaved {
                            message_id,
                            record: saved,
                            created,
                        }])
                    },
                )
                .await;
            });
        }
        Command::ArchiveRecord {
            message_id,
            record_id,
        } => {
            tokio::spawn(async move {
                run_operation(
                    tx,
                    "Deleting entry...",
                    "Error",
                    move || async move {
                        session
                            .call(move |store| {
                                let id = record_id.clone();
                                async move { store.archive_record(&id).await }.boxed()
                            })
                            .await?;
                        Ok(vec![Action::RecordArchived(message_id)])
                    },
                )
                .await;
            });
        }
    }
    Ok(())
}

async fn fetch_schema(session: &Session) -> Result<crate::domain::models::Schema> {
    session
        .call(|store| async move { store.get_schema().await }.boxed())
        .await
}

fn unsupported_notice(form: &RecordForm) -> Vec<Action> {
    if form.unsupported.is_empty() {
        return Vec::new();
    }
    vec![Action::Notice(format!(
        "Skipped unsupported properties: {}",
        form.unsupported.join(", ")
    ))]
}

/// Announce the operation, run it, and forward either its result actions or
/// one error reply prefixed with `error_prefix`.
async fn run_operation<F, Fut>(
    tx: mpsc::Sender<Action>,
    start_msg: &str,
    error_prefix: &'static str,
    operation: F,
) where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<Vec<Action>>>,
{
    let _ = tx.send(Action::OperationStarted(start_msg.to_string())).await;
    match operation().await {
        Ok(actions) => {
            for action in actions {
                let _ = tx.send(action).await;
            }
        }
        Err(e) => {
            warn!(error = %e, "{error_prefix}");
            let _ = tx
                .send(Action::ErrorOccurred(format!("{error_prefix}: {e}")))
                .await;
        }
    }
}
