use super::*;
use crate::Error;
use crate::ID;
use crate::Missing;
use crate::Unique;
use crate::engine::Engine;
use crate::store::Room;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::Responder;
use actix_web::ResponseError;
use actix_web::web;
use serde_json::json;

fn room(path: web::Path<uuid::Uuid>) -> ID<Room> {
    ID::from(path.into_inner())
}

pub async fn health() -> impl Responder {
    HttpResponse::Ok().body("ok")
}

pub async fn dreams(engine: web::Data<Engine>) -> impl Responder {
    let dreams = engine
        .catalog()
        .dreams()
        .await
        .into_iter()
        .map(|d| {
            json!({
                "id": d.id(),
                "name": d.name(),
                "slug": d.slug(),
                "cost": d.cost(),
                "prerequisite": d.prerequisite(),
            })
        })
        .collect::<Vec<_>>();
    HttpResponse::Ok().json(dreams)
}

pub async fn decks(engine: web::Data<Engine>) -> impl Responder {
    HttpResponse::Ok().json(engine.catalog().decks().await)
}

pub async fn savings_cards(engine: web::Data<Engine>) -> impl Responder {
    let cards = engine
        .catalog()
        .savings_cards()
        .await
        .into_iter()
        .map(|c| {
            json!({
                "id": c.id(),
                "name": c.name(),
                "save_threshold": c.threshold(),
                "bonus_condition": c.bonus(),
            })
        })
        .collect::<Vec<_>>();
    HttpResponse::Ok().json(cards)
}

pub async fn spending_cards(engine: web::Data<Engine>) -> impl Responder {
    let cards = engine
        .catalog()
        .spending_cards()
        .await
        .into_iter()
        .map(|c| {
            json!({
                "id": c.id(),
                "name": c.name(),
                "total_cost": c.total(),
            })
        })
        .collect::<Vec<_>>();
    HttpResponse::Ok().json(cards)
}

pub async fn create(engine: web::Data<Engine>, req: web::Json<CreateRequest>) -> impl Responder {
    match engine.create(req.num_players, req.dream_id).await {
        Ok(room) => HttpResponse::Created().json(json!({ "matchId": room.id() })),
        Err(e) => e.error_response(),
    }
}

pub async fn join(
    engine: web::Data<Engine>,
    path: web::Path<uuid::Uuid>,
    req: web::Json<JoinRequest>,
) -> impl Responder {
    match engine
        .join(room(path), req.user_id, req.seat_position, req.is_ai)
        .await
    {
        Ok(_) => HttpResponse::Ok().json(json!({ "ok": true })),
        Err(e) => e.error_response(),
    }
}

pub async fn start(engine: web::Data<Engine>, path: web::Path<uuid::Uuid>) -> impl Responder {
    match engine.start(room(path)).await {
        Ok(_) => HttpResponse::Ok().json(json!({ "ok": true })),
        Err(e) => e.error_response(),
    }
}

pub async fn state(engine: web::Data<Engine>, path: web::Path<uuid::Uuid>) -> impl Responder {
    match engine.state(room(path)).await {
        Ok(snapshot) => HttpResponse::Ok().json(snapshot),
        Err(e) => e.error_response(),
    }
}

pub async fn discard(engine: web::Data<Engine>, path: web::Path<uuid::Uuid>) -> impl Responder {
    match engine.discard(room(path)).await {
        Ok(()) => HttpResponse::Ok().json(json!({ "ok": true })),
        Err(e) => e.error_response(),
    }
}

pub async fn roll(
    engine: web::Data<Engine>,
    path: web::Path<uuid::Uuid>,
    req: web::Json<PlayerRequest>,
) -> impl Responder {
    match engine.roll(room(path), req.user_id).await {
        Ok(roll) => HttpResponse::Ok().json(json!({ "dice": [roll.0, roll.1], "sum": roll.sum() })),
        Err(e) => e.error_response(),
    }
}

pub async fn step(
    engine: web::Data<Engine>,
    path: web::Path<uuid::Uuid>,
    req: web::Json<MoveRequest>,
) -> impl Responder {
    match engine
        .move_token(room(path), req.user_id, req.token_index, req.steps)
        .await
    {
        Ok(moved) => HttpResponse::Ok().json(json!({
            "ok": true,
            "position": moved.position,
            "penalty": moved.penalized,
            "returns": moved.payouts,
            "currentTurn": moved.next,
        })),
        Err(e) => e.error_response(),
    }
}

pub async fn select_asset(
    engine: web::Data<Engine>,
    path: web::Path<uuid::Uuid>,
    req: web::Json<AssetRequest>,
) -> impl Responder {
    match engine
        .select_asset(room(path), req.user_id, &req.asset_id)
        .await
    {
        Ok(selected) => HttpResponse::Ok().json(json!({
            "ok": true,
            "assets": selected.assets,
            "currentTurn": selected.next,
        })),
        Err(e) => e.error_response(),
    }
}

pub async fn draw(
    engine: web::Data<Engine>,
    path: web::Path<uuid::Uuid>,
    req: web::Json<PlayerRequest>,
) -> impl Responder {
    match engine.draw_event_card(room(path), req.user_id).await {
        Ok(drawn) => HttpResponse::Ok().json(json!({
            "ok": true,
            "card": {
                "cardId": drawn.card.id(),
                "title": drawn.card.title(),
                "message": drawn.card.message(),
                "effect_points": drawn.card.effect(),
            },
            "currentPoints": drawn.points,
            "liabilities": drawn.liabilities,
        })),
        Err(e) => e.error_response(),
    }
}

pub async fn savings(
    engine: web::Data<Engine>,
    path: web::Path<uuid::Uuid>,
    req: web::Json<SavingsRequest>,
) -> impl Responder {
    match engine
        .play_savings_card(room(path), req.user_id, req.card_id, req.amount)
        .await
    {
        Ok(saved) => HttpResponse::Ok().json(json!({
            "ok": true,
            "savings": saved.savings,
            "currentPoints": saved.points,
        })),
        Err(e) => e.error_response(),
    }
}

pub async fn spending(
    engine: web::Data<Engine>,
    path: web::Path<uuid::Uuid>,
    req: web::Json<SpendingRequest>,
) -> impl Responder {
    match engine
        .play_spending_card(room(path), req.user_id, req.card_id)
        .await
    {
        Ok(liabilities) => HttpResponse::Ok().json(json!({ "ok": true, "liabilities": liabilities })),
        Err(e) => e.error_response(),
    }
}

pub async fn purchase_dream(
    engine: web::Data<Engine>,
    path: web::Path<uuid::Uuid>,
    req: web::Json<DreamRequest>,
) -> impl Responder {
    match engine
        .purchase_dream(room(path), req.user_id, req.dream_id)
        .await
    {
        Ok(won) => HttpResponse::Ok().json(json!({
            "ok": true,
            "winnerId": won.winner,
            "dreamId": won.dream,
        })),
        Err(e) => e.error_response(),
    }
}

pub async fn stream(
    engine: web::Data<Engine>,
    path: web::Path<uuid::Uuid>,
    body: web::Payload,
    req: HttpRequest,
) -> HttpResponse {
    let id = room(path);
    if !engine.store().contains(id).await {
        return Error::from(Missing::Room).error_response();
    }
    let session = Session::new(id, engine.hub().clone());
    match actix_ws::handle(&req, body) {
        Ok((response, socket, stream)) => match session.bridge(engine.store(), socket, stream).await {
            Ok(()) => response,
            Err(e) => e.error_response(),
        },
        Err(e) => HttpResponse::BadRequest().body(e.to_string()),
    }
}
