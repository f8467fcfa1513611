use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::tools::{bad_args, ToolExecutor};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateCalendarEventParams {
    #[schemars(
        description = "Natural language description of the event including date/time. \
                       Example: \"Team meeting tomorrow at 3pm\" or \"Doctor appointment on March 20 at 2:30pm\""
    )]
    pub text: String,
}

pub(crate) async fn run(exec: &mut ToolExecutor<'_>, args: &Value) -> Value {
    let params: CreateCalendarEventParams = match serde_json::from_value(args.clone()) {
        Ok(p) => p,
        Err(e) => return bad_args("createCalendarEvent", e),
    };

    let Some(calendar) = exec.calendar else {
        return json!({ "success": false, "error": "Google Calendar is not configured." });
    };

    match calendar.quick_add(&params.text).await {
        Ok(event) => json!({
            "success": true,
            "eventId": event.event_id,
            "summary": event.summary,
        }),
        Err(err) => json!({ "success": false, "error": err.to_string() }),
    }
}
