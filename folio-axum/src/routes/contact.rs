use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::post,
};
use folio::{ContactFormResult, RepositoryProvider, SubmissionOutcome};

use crate::{extractors::Payload, middleware::AppState, types::ContactRequest};

pub(super) fn routes<R>() -> Router<AppState<R>>
where
    R: RepositoryProvider + 'static,
{
    Router::new().route("/api/contact", post(submit_handler))
}

/// Always answers with a form result, whatever the outcome.
async fn submit_handler<R>(
    State(state): State<AppState<R>>,
    payload: Payload<ContactRequest>,
) -> (StatusCode, Json<ContactFormResult>)
where
    R: RepositoryProvider,
{
    let (submission, form_state) = payload.into_inner().into_parts();
    let reply = state.folio.submit_contact(submission, form_state).await;
    (outcome_status(&reply.outcome), Json(reply.form))
}

fn outcome_status(outcome: &SubmissionOutcome) -> StatusCode {
    match outcome {
        SubmissionOutcome::Accepted(_)
        | SubmissionOutcome::SilentlyAccepted
        | SubmissionOutcome::ChallengeRequired
        | SubmissionOutcome::ChallengeFailed => StatusCode::OK,
        SubmissionOutcome::Invalid(_) => StatusCode::BAD_REQUEST,
        SubmissionOutcome::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        SubmissionOutcome::Failed => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
