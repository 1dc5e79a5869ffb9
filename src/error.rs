/// Entities the engine looks up and may fail to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
    Room,
    Player,
    User,
    Card,
    Dream,
}

/// Validation failures. Each leaves match state untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invalid {
    PlayerCount,
    Seat,
    SeatTaken,
    AlreadyJoined,
    NotWaiting,
    NotActive,
    TokenIndex,
    Steps,
    Amount,
    InsufficientPoints,
    AssetCount,
    Liabilities,
    Savings,
    DreamCost,
    Prerequisite,
    WrongDream,
    MissingField(&'static str),
}

/// Errors returned by store and engine operations.
///
/// None of these are retried by the engine. Every mutating action is
/// all-or-nothing, so any error means nothing was persisted or published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    NotFound(Missing),
    Invalid(Invalid),
    /// Acting out of turn.
    Forbidden,
    /// Row lock could not be acquired in time.
    Timeout,
}

impl std::fmt::Display for Missing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Room => write!(f, "match not found"),
            Self::Player => write!(f, "player not found"),
            Self::User => write!(f, "user not found"),
            Self::Card => write!(f, "card not found"),
            Self::Dream => write!(f, "dream not found"),
        }
    }
}

impl std::fmt::Display for Invalid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PlayerCount => write!(f, "player count must be at least 1"),
            Self::Seat => write!(f, "seat position out of range"),
            Self::SeatTaken => write!(f, "seat already taken"),
            Self::AlreadyJoined => write!(f, "user already joined this match"),
            Self::NotWaiting => write!(f, "match is not waiting for players"),
            Self::NotActive => write!(f, "match is not active"),
            Self::TokenIndex => write!(f, "invalid token index"),
            Self::Steps => write!(f, "steps out of range"),
            Self::Amount => write!(f, "invalid amount"),
            Self::InsufficientPoints => write!(f, "insufficient points"),
            Self::AssetCount => write!(f, "must have purchased 2 assets"),
            Self::Liabilities => write!(f, "liabilities must be cleared"),
            Self::Savings => write!(f, "savings must be at least 500"),
            Self::DreamCost => write!(f, "insufficient on-hand points for dream"),
            Self::Prerequisite => write!(f, "prerequisite dream not unlocked"),
            Self::WrongDream => write!(f, "dream is not the one bound to this match"),
            Self::MissingField(field) => write!(f, "{} required", field),
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(missing) => write!(f, "{}", missing),
            Self::Invalid(invalid) => write!(f, "{}", invalid),
            Self::Forbidden => write!(f, "not your turn"),
            Self::Timeout => write!(f, "timed out waiting for match state"),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(feature = "server")]
impl actix_web::ResponseError for Error {
    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Invalid(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Timeout => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
    fn error_response(&self) -> actix_web::HttpResponse {
        actix_web::HttpResponse::build(self.status_code())
            .json(serde_json::json!({ "detail": self.to_string() }))
    }
}

impl From<Missing> for Error {
    fn from(missing: Missing) -> Self {
        Self::NotFound(missing)
    }
}
impl From<Invalid> for Error {
    fn from(invalid: Invalid) -> Self {
        Self::Invalid(invalid)
    }
}
