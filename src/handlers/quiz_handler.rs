use actix_web::{get, post, web, HttpRequest, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    middleware::get_request_id,
    models::dto::request::{GenerateQuizRequest, SubmitQuizRequest},
};

/// Non-numeric ids can never match a stored quiz.
fn parse_quiz_id(raw: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::NotFound("Quiz not found".to_string()))
}

#[post("/generate-quiz")]
pub async fn generate_quiz(
    state: web::Data<AppState>,
    req: HttpRequest,
    request: web::Json<GenerateQuizRequest>,
) -> Result<HttpResponse, AppError> {
    let command = request.into_inner().into_command()?;
    log::info!(
        "[{}] Generating {} questions from '{}'",
        get_request_id(&req).unwrap_or_default(),
        command.question_count,
        command.file_name
    );
    let quiz = state.quiz_service.generate_quiz(command).await?;
    Ok(HttpResponse::Ok().json(quiz))
}

#[get("/quiz/{id}")]
pub async fn get_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_quiz_id(&id)?;
    let quiz = state.quiz_service.get_quiz(id).await?;
    Ok(HttpResponse::Ok().json(quiz))
}

#[post("/quiz/{id}/submit")]
pub async fn submit_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<SubmitQuizRequest>,
) -> Result<HttpResponse, AppError> {
    let answers = request.into_inner().parse_answers()?;
    let id = parse_quiz_id(&id)?;
    let response = state
        .quiz_attempt_service
        .submit_attempt(id, &answers)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Config,
        handlers::configure_routes,
        models::domain::NewQuiz,
        repositories::{InMemoryQuizAttemptRepository, InMemoryQuizRepository, QuizRepository},
        services::document_service::MockTextExtractor,
        test_utils::{
            fixtures::sample_question,
            test_helpers::{assert_error_status, assert_success_status},
        },
    };
    use actix_web::{test as actix_test, App};
    use std::sync::Arc;

    #[actix_web::test]
    async fn get_quiz_serves_stored_quiz_and_404s_otherwise() {
        let quizzes = Arc::new(InMemoryQuizRepository::new());
        let quiz = quizzes
            .create(NewQuiz::new("a.pdf", 10, "text", vec![sample_question("q1", 2)]))
            .await
            .unwrap();
        let state = AppState::with_parts(
            Config::test_config(),
            quizzes,
            Arc::new(InMemoryQuizAttemptRepository::new()),
            None,
            Arc::new(MockTextExtractor::new()),
        );
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure_routes),
        )
        .await;

        let req = actix_test::TestRequest::get()
            .uri(&format!("/api/quiz/{}", quiz.id))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_success_status(resp.status());
        let body: serde_json::Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["questions"][0]["correctAnswer"], 2);

        let req = actix_test::TestRequest::get().uri("/api/quiz/12345").to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_error_status(resp.status());
    }

    #[test]
    fn parse_quiz_id_accepts_integers() {
        assert_eq!(parse_quiz_id("42").unwrap(), 42);
        assert_eq!(parse_quiz_id(" 7 ").unwrap(), 7);
    }

    #[test]
    fn parse_quiz_id_maps_garbage_to_not_found() {
        assert!(matches!(parse_quiz_id("abc"), Err(AppError::NotFound(_))));
    }
}
