//! One handler per route. Every write handler opens a single unit of work,
//! runs the service calls against it, and commits only when all of them
//! succeeded; an early `?` drops the unit of work and rolls the batch back.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use domains::{CreditRepository, DomainError, MemberId, WorkId};
use serde_json::{json, Value};
use services::critiques::NewCritique;
use services::ratings::NewRating;
use services::works::NewWork;
use services::{credits, critiques, iam, ratings, works};
use storage_adapters::SqliteUnitOfWork;

use crate::error::ApiError;
use crate::schemas::{
    CreditBalanceResponse, CritiqueRequest, CritiqueResponse, LoginRequest, MemberResponse,
    ModerationRequest, RatingRequest, RatingResponse, RegisterMemberRequest, TransactionResponse,
    WorkRequest, WorkResponse,
};
use crate::AppState;

pub async fn healthcheck() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn register_member(
    State(state): State<AppState>,
    Json(body): Json<RegisterMemberRequest>,
) -> Result<(StatusCode, Json<MemberResponse>), ApiError> {
    let uow = SqliteUnitOfWork::begin(&state.pool).await?;
    let member = iam::register_member(
        &mut uow.members(),
        &body.username,
        &body.email,
        &body.password,
        &body.confirm_password,
    )
    .await?;
    if state.credit_rules.bonus("new_member").is_some() {
        credits::award_new_member_bonus(&mut uow.credits(), &state.credit_rules, member.id).await?;
    }
    uow.commit().await?;
    Ok((StatusCode::CREATED, Json(MemberResponse::from(&member))))
}

pub async fn login_member(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<MemberResponse>, ApiError> {
    let uow = SqliteUnitOfWork::begin(&state.pool).await?;
    let member = iam::login_member(&mut uow.members(), &body.email, &body.password).await?;
    uow.commit().await?;
    Ok(Json(MemberResponse::from(&member)))
}

pub async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MemberResponse>, ApiError> {
    let member_id = MemberId::parse_str(&id)?;
    let uow = SqliteUnitOfWork::begin(&state.pool).await?;
    let member = iam::get_member_by_id(&mut uow.members(), member_id).await?;
    Ok(Json(MemberResponse::from(&member)))
}

pub async fn member_credits(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CreditBalanceResponse>, ApiError> {
    let member_id = MemberId::parse_str(&id)?;
    let uow = SqliteUnitOfWork::begin(&state.pool).await?;
    iam::get_member_by_id(&mut uow.members(), member_id).await?;
    let transactions = uow.credits().list_for_member(member_id).await?;
    let balance: f64 = transactions.iter().map(|t| t.amount).sum();
    Ok(Json(CreditBalanceResponse {
        member_id: member_id.to_string(),
        balance,
        transactions: transactions.iter().map(TransactionResponse::from).collect(),
    }))
}

pub async fn create_work(
    State(state): State<AppState>,
    Json(body): Json<WorkRequest>,
) -> Result<(StatusCode, Json<WorkResponse>), ApiError> {
    let uow = SqliteUnitOfWork::begin(&state.pool).await?;
    let work = works::add_work(
        &mut uow.works(),
        state.work_max_words,
        NewWork {
            title: &body.title,
            content: &body.content,
            member_id: &body.member_id,
            genre: &body.genre,
            age_restriction: &body.age_restriction,
            work_id: body.work_id.as_deref(),
        },
    )
    .await?;
    iam::add_work_to_member(&mut uow.members(), work.member_id, work.clone()).await?;
    credits::award_for_submission(&mut uow.credits(), &state.credit_rules, &work).await?;
    uow.commit().await?;
    Ok((StatusCode::CREATED, Json(WorkResponse::from(&work))))
}

pub async fn list_works(
    State(state): State<AppState>,
) -> Result<Json<Vec<WorkResponse>>, ApiError> {
    let uow = SqliteUnitOfWork::begin(&state.pool).await?;
    let listed = works::list_works(&mut uow.works()).await?;
    Ok(Json(listed.iter().map(WorkResponse::from).collect()))
}

pub async fn get_work(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<WorkResponse>, ApiError> {
    let work_id = WorkId::parse_str(&id)?;
    let uow = SqliteUnitOfWork::begin(&state.pool).await?;
    let work = works::get_work_by_id(&mut uow.works(), work_id).await?;
    Ok(Json(WorkResponse::from(&work)))
}

pub async fn approve_work(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ModerationRequest>,
) -> Result<Json<WorkResponse>, ApiError> {
    let work_id = WorkId::parse_str(&id)?;
    let actor_id = MemberId::parse_str(&body.actor_id)?;

    let uow = SqliteUnitOfWork::begin(&state.pool).await?;
    let actor = iam::get_member_by_id(&mut uow.members(), actor_id).await?;
    if !actor.has_permission(&state.roles, "write", "works") {
        return Err(DomainError::PermissionDenied("not allowed to moderate works".into()).into());
    }
    let work = works::approve_work(&mut uow.works(), work_id).await?;
    uow.commit().await?;
    Ok(Json(WorkResponse::from(&work)))
}

pub async fn create_critique(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<CritiqueRequest>,
) -> Result<(StatusCode, Json<CritiqueResponse>), ApiError> {
    let uow = SqliteUnitOfWork::begin(&state.pool).await?;
    let critique = critiques::add_critique(
        &mut uow.works(),
        &mut uow.critiques(),
        &state.critique_limits,
        NewCritique {
            about: &body.about,
            successes: &body.successes,
            weaknesses: &body.weaknesses,
            ideas: &body.ideas,
            member_id: &body.member_id,
            work_id: &id,
        },
    )
    .await?;
    iam::add_critique_to_member(&mut uow.members(), critique.member_id, critique.clone()).await?;
    credits::award_for_critique(&mut uow.credits(), &state.credit_rules, &critique).await?;
    uow.commit().await?;
    Ok((StatusCode::CREATED, Json(CritiqueResponse::from(&critique))))
}

pub async fn create_rating(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<RatingRequest>,
) -> Result<(StatusCode, Json<RatingResponse>), ApiError> {
    let uow = SqliteUnitOfWork::begin(&state.pool).await?;
    let rating = ratings::add_rating(
        &mut uow.critiques(),
        &mut uow.ratings(),
        NewRating {
            score: body.score,
            comment: body.comment.as_deref(),
            critique_id: &id,
            member_id: &body.member_id,
        },
    )
    .await?;
    uow.commit().await?;
    Ok((StatusCode::CREATED, Json(RatingResponse::from(&rating))))
}
