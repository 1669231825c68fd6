use std::path::Path;

use kt_model::{
    AttemptLabel, Env, LABEL_APP, LABEL_TRAINING_ATTEMPT, Labels, PAYLOAD_HOLDER_NAME,
    PAYLOAD_SCRIPT_KEY, ResourceKind, WorkerIndex,
};
use serde_json::{Map, Value, json};
use tracing::trace;

use crate::{
    error::{CoreError, TemplateError},
    template::{BaseTemplate, RenderedResource, TemplateRole},
};

/// Config map carrying `script` verbatim under `training-script.py`.
pub fn payload_holder(script: &str, label: &AttemptLabel) -> RenderedResource {
    let body = json!({
        "apiVersion": "v1",
        "kind": "ConfigMap",
        "metadata": {
            "name": PAYLOAD_HOLDER_NAME,
            "labels": { LABEL_TRAINING_ATTEMPT: label.as_str() },
        },
        "data": { PAYLOAD_SCRIPT_KEY: script },
    });
    RenderedResource::from_body(ResourceKind::PayloadHolder, body)
}

/// Reads the payload script and wraps it with [`payload_holder`].
pub fn render_payload_holder(
    script_path: &Path,
    label: &AttemptLabel,
) -> Result<RenderedResource, CoreError> {
    let script = std::fs::read_to_string(script_path).map_err(|source| CoreError::Read {
        what: "payload script",
        path: script_path.to_path_buf(),
        source,
    })?;
    trace!(path = %script_path.display(), bytes = script.len(), "payload script read");
    Ok(payload_holder(&script, label))
}

/// Worker pod `worker{index}` from a fresh copy of `template`.
///
/// Sets name, `app` and attempt labels, the image, replaces the first
/// container's env list wholesale with `env` and, when given, its command.
pub fn render_worker(
    template: &BaseTemplate,
    index: WorkerIndex,
    label: &AttemptLabel,
    image: &str,
    env: &Env,
    command: Option<&[String]>,
) -> Result<RenderedResource, TemplateError> {
    let mut doc = template.instantiate(TemplateRole::Worker)?;
    let name = index.host();

    set_identity(template, &mut doc, &name, &Labels::for_worker(label, index))?;

    let container = doc
        .pointer_mut("/spec/containers/0")
        .and_then(Value::as_object_mut)
        .ok_or_else(|| template.missing("spec.containers[0]"))?;
    container.insert("env".to_string(), to_value(env));
    container.insert("image".to_string(), Value::String(image.to_string()));
    if let Some(command) = command {
        container.insert("command".to_string(), json!(command));
    }

    trace!(worker = %name, env_len = env.len(), "worker rendered");
    Ok(RenderedResource::from_body(ResourceKind::Worker, doc))
}

/// Service `worker{index}` selecting `app=worker{index}` on `port`.
pub fn render_endpoint(
    template: &BaseTemplate,
    index: WorkerIndex,
    label: &AttemptLabel,
    port: u16,
) -> Result<RenderedResource, TemplateError> {
    let mut doc = template.instantiate(TemplateRole::Endpoint)?;
    let name = index.host();

    set_identity(template, &mut doc, &name, &Labels::for_attempt(label))?;

    doc.pointer_mut("/spec/selector")
        .and_then(Value::as_object_mut)
        .ok_or_else(|| template.missing("spec.selector"))?
        .insert(LABEL_APP.to_string(), Value::String(name.clone()));

    let first_port = doc
        .pointer_mut("/spec/ports/0")
        .and_then(Value::as_object_mut)
        .ok_or_else(|| template.missing("spec.ports[0]"))?;
    first_port.insert("port".to_string(), json!(port));
    first_port.insert("targetPort".to_string(), json!(port));

    trace!(endpoint = %name, port, "endpoint rendered");
    Ok(RenderedResource::from_body(ResourceKind::Endpoint, doc))
}

/// `metadata.name`, plus `labels` merged over whatever the template carries.
fn set_identity(
    template: &BaseTemplate,
    doc: &mut Value,
    name: &str,
    labels: &Labels,
) -> Result<(), TemplateError> {
    doc.pointer_mut("/metadata")
        .and_then(Value::as_object_mut)
        .ok_or_else(|| template.missing("metadata"))?
        .insert("name".to_string(), Value::String(name.to_string()));
    let target = labels_mut(template, doc)?;
    for (key, value) in labels.iter() {
        target.insert(key.to_string(), Value::String(value.to_string()));
    }
    Ok(())
}

fn labels_mut<'a>(
    template: &BaseTemplate,
    doc: &'a mut Value,
) -> Result<&'a mut Map<String, Value>, TemplateError> {
    doc.pointer_mut("/metadata/labels")
        .and_then(Value::as_object_mut)
        .ok_or_else(|| template.missing("metadata.labels"))
}

fn to_value(env: &Env) -> Value {
    Value::Array(
        env.iter()
            .map(|kv| json!({"name": kv.name(), "value": kv.value()}))
            .collect(),
    )
}
