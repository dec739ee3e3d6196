//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::AppError;
use crate::api::{ApiResponse, CollectionApi};
use crate::bootstrap::{App, PageView};
use crate::store::SyncedCollection;
use modeler_core::{Entity, Field, Object, ObjectUuid, Record, sanitize_identifier};
use serde::Serialize;
use serde_json::{Map, Value, json};

// =============================================================================
// RENDERING
// =============================================================================

/// One-line text rendering of an entity.
trait Render {
    fn line(&self) -> String;
}

fn summarize(attributes: &Map<String, Value>) -> String {
    attributes
        .iter()
        .map(|(k, v)| match v {
            Value::String(s) => format!("{k}={s}"),
            other => format!("{k}={other}"),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl Render for Object {
    fn line(&self) -> String {
        format!("{}  {}", self.object_uuid, summarize(&self.attributes))
    }
}

impl Render for Field {
    fn line(&self) -> String {
        format!("{}  {}", self.field_uuid, summarize(&self.attributes))
    }
}

impl Render for Record {
    fn line(&self) -> String {
        format!("{}  {}", self.record_uuid, summarize(&self.values))
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Io(format!("cannot encode output: {e}")))?;
    println!("{text}");
    Ok(())
}

fn print_list<T: Render>(title: &str, items: &[T]) {
    println!("{} ({})", title, items.len());
    for item in items {
        println!("  {}", item.line());
    }
}

fn print_response(response: &ApiResponse) {
    match &response.body {
        Value::Null => println!("HTTP {}", response.status),
        body => println!("HTTP {}  {}", response.status, body),
    }
}

// =============================================================================
// PAYLOADS
// =============================================================================

/// Build a request payload from `--data` JSON and an optional `--name`.
///
/// The name is sanitized into an identifier before it is sent.
pub fn build_payload(name: Option<&str>, data: Option<&str>) -> Result<Value, AppError> {
    let mut payload = match data {
        Some(text) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                return Err(AppError::InvalidPayload(format!(
                    "expected a JSON object, got {other}"
                )));
            }
            Err(e) => return Err(AppError::InvalidPayload(e.to_string())),
        },
        None => Map::new(),
    };
    if let Some(raw) = name {
        payload.insert("name".to_string(), Value::String(sanitize_identifier(raw)?));
    }
    Ok(Value::Object(payload))
}

// =============================================================================
// OBJECTS COMMAND
// =============================================================================

/// Run an object action.
pub async fn cmd_objects(
    app: &App,
    action: super::ObjectAction,
    json_mode: bool,
) -> Result<(), AppError> {
    use super::ObjectAction;

    let objects = &app.store.objects;
    let response = match action {
        ObjectAction::List => {
            objects.load().await?;
            let all = objects.all().await;
            if json_mode {
                return print_json(&all);
            }
            print_list("Objects", &all);
            return Ok(());
        }
        ObjectAction::Get { uuid } => {
            let object = objects.fetch_one(&ObjectUuid::new(uuid)).await?;
            if json_mode {
                return print_json(&object);
            }
            println!("{}", object.line());
            return Ok(());
        }
        ObjectAction::Create { name, data } => {
            let payload = build_payload(name.as_deref(), data.as_deref())?;
            objects.create_object(&payload).await?
        }
        ObjectAction::Update { uuid, name, data } => {
            let payload = build_payload(name.as_deref(), data.as_deref())?;
            objects.update_object(&ObjectUuid::new(uuid), &payload).await?
        }
        ObjectAction::Delete { uuid } => app.store.delete_object(&ObjectUuid::new(uuid)).await?,
    };

    let cached = objects.all().await;
    if json_mode {
        return print_json(&json!({ "response": response, "cached": cached }));
    }
    print_response(&response);
    print_list("Objects", &cached);
    Ok(())
}

// =============================================================================
// FIELDS / RECORDS COMMANDS
// =============================================================================

/// Run a child action (fields or records) against one object's collection.
async fn run_child<A>(
    store: &SyncedCollection<A>,
    title: &str,
    object: &str,
    action: super::ChildAction,
    json_mode: bool,
) -> Result<(), AppError>
where
    A: CollectionApi<Parent = ObjectUuid>,
    A::Item: Serialize + Render,
    <A::Item as Entity>::Id: for<'a> From<&'a str>,
{
    use super::ChildAction;

    let parent = ObjectUuid::new(object);
    let response = match action {
        ChildAction::List => {
            store.fetch(&parent).await?;
            None
        }
        ChildAction::Create { name, data } => {
            let payload = build_payload(name.as_deref(), data.as_deref())?;
            Some(store.create(&parent, &payload).await?)
        }
        ChildAction::Update { id, name, data } => {
            let payload = build_payload(name.as_deref(), data.as_deref())?;
            let id = <A::Item as Entity>::Id::from(id.as_str());
            Some(store.update(&parent, &id, &payload).await?)
        }
        ChildAction::Delete { id } => {
            let id = <A::Item as Entity>::Id::from(id.as_str());
            Some(store.delete(&parent, &id).await?)
        }
    };

    let cached = store.cached(&parent).await;
    if json_mode {
        return match response {
            Some(response) => print_json(&json!({ "response": response, "cached": cached })),
            None => print_json(&cached),
        };
    }
    if let Some(response) = &response {
        print_response(response);
    }
    print_list(&format!("{title} of {parent}"), &cached);
    Ok(())
}

/// Run a field action.
pub async fn cmd_fields(
    app: &App,
    object: &str,
    action: super::ChildAction,
    json_mode: bool,
) -> Result<(), AppError> {
    run_child(&app.store.fields, "Fields", object, action, json_mode).await
}

/// Run a record action.
pub async fn cmd_records(
    app: &App,
    object: &str,
    action: super::ChildAction,
    json_mode: bool,
) -> Result<(), AppError> {
    run_child(&app.store.records, "Records", object, action, json_mode).await
}

// =============================================================================
// OPEN COMMAND
// =============================================================================

/// Navigate to a route and print its page.
pub async fn cmd_open(app: &App, path: &str, json_mode: bool) -> Result<(), AppError> {
    let view = app.open(path).await?;
    if json_mode {
        return print_json(&view);
    }

    match view {
        PageView::Home => {
            println!("Modeler v{}", env!("CARGO_PKG_VERSION"));
            println!("Backend: {}", app.config.api.base_url);
            println!();
            println!("Try: modeler open /objects");
        }
        PageView::Objects { objects } => print_list("Objects", &objects),
        PageView::ObjectDetail {
            object,
            fields,
            records,
        } => {
            println!("{}", object.line());
            println!();
            print_list("Fields", &fields);
            println!();
            print_list("Records", &records);
        }
    }
    Ok(())
}

// =============================================================================
// OFFLINE COMMANDS
// =============================================================================

/// Resolve a path and print the match.
pub fn cmd_route(path: &str, json_mode: bool) -> Result<(), AppError> {
    let route = modeler_core::RouteTable::standard().resolve(path)?;
    if json_mode {
        return print_json(&route);
    }
    println!("{} -> {:?} ({})", path, route.page, route.path);
    for (key, value) in &route.params {
        println!("  {key} = {value}");
    }
    Ok(())
}

/// Sanitize text and print the identifier.
pub fn cmd_sanitize(text: &str, json_mode: bool) -> Result<(), AppError> {
    let identifier = sanitize_identifier(text)?;
    if json_mode {
        return print_json(&json!({ "input": text, "identifier": identifier }));
    }
    println!("{identifier}");
    Ok(())
}

/// Print the effective configuration and resolved theme.
pub fn cmd_config(app: &App) -> Result<(), AppError> {
    print_json(&json!({ "config": app.config, "theme": app.theme }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use modeler_core::ModelerError;

    #[test]
    fn payload_defaults_to_empty_object() {
        assert_eq!(build_payload(None, None).expect("payload"), json!({}));
    }

    #[test]
    fn name_is_sanitized() {
        let payload = build_payload(Some("First Name!"), Some(r#"{"type":"text"}"#)).expect("payload");
        assert_eq!(payload, json!({"type": "text", "name": "first_name"}));
    }

    #[test]
    fn invalid_name_is_rejected() {
        let result = build_payload(Some("!!!"), None);
        assert!(matches!(
            result,
            Err(AppError::Core(ModelerError::InvalidIdentifier { .. }))
        ));
    }

    #[test]
    fn non_object_data_is_rejected() {
        assert!(matches!(
            build_payload(None, Some("[1,2]")),
            Err(AppError::InvalidPayload(_))
        ));
        assert!(matches!(
            build_payload(None, Some("{not json")),
            Err(AppError::InvalidPayload(_))
        ));
    }

    #[test]
    fn render_lines() {
        let object = Object::new("o1").with("name", "customer").with("version", 2);
        assert_eq!(object.line(), "o1  name=customer version=2");
        let record = Record::new("r1").with("email", "a@b.c");
        assert_eq!(record.line(), "r1  email=a@b.c");
    }
}
