//! `suggestion.create`: parse the form, run it through the pipeline, and
//! return the flat protocol response.

use crate::app::DaemonState;
use astp_protocol::CreateForm;
use suggest_ipc::{error_codes, IpcServer, Method, Request, Response};
use tracing::{debug, info, warn};

pub async fn register(server: &IpcServer, state: DaemonState) {
    server
        .register_handler(Method::SuggestionCreate, move |req| {
            let state = state.clone();
            async move { create(&state, req).await }
        })
        .await;

    info!("Registered create handler");
}

async fn create(state: &DaemonState, req: Request) -> Response {
    let Some(params) = req.params.as_ref() else {
        return Response::error(&req.id, error_codes::INVALID_PARAMS, "params are required");
    };

    let form = match CreateForm::from_params(params) {
        Ok(form) => form,
        Err(e) => {
            warn!(request_id = %req.id, error = %e, "Malformed create params");
            return Response::error(&req.id, error_codes::INVALID_PARAMS, &e.to_string());
        }
    };

    let response = state.pipeline.create(form).await;
    debug!(
        request_id = %req.id,
        entries = response.len(),
        rejected = response.is_rejected(),
        "Create request answered"
    );

    match response.to_value() {
        Ok(value) => Response::success(&req.id, value),
        Err(e) => Response::error(&req.id, error_codes::INTERNAL_ERROR, &e.to_string()),
    }
}
