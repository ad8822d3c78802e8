use actix_session::{config::PersistentSession, Session, SessionExt, SessionGetError, SessionInsertError, SessionMiddleware};
use actix_web::{cookie::{time::Duration, Key, SameSite}, FromRequest};
use futures_util::future::{ready, Ready};
use secrecy::ExposeSecret;

use crate::{configuration::SessionSettings, models::SessionUser, session_store::PgSessionStore};

const USER_KEY: &str = "user";

pub struct TypedSession(pub Session);

impl TypedSession {
    pub fn get_user(&self) -> Result<Option<SessionUser>, SessionGetError>{
        self.0.get(USER_KEY)
    }

    pub fn insert_user(&self, user: &SessionUser) -> Result<(), SessionInsertError>{
        self.0.insert(USER_KEY, user)
    }

    pub fn renew(&self){
        self.0.renew();
    }

    pub fn purge(&self){
        self.0.purge();
    }
}

impl FromRequest for TypedSession {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &actix_web::HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let session = req.get_session();
        ready(Ok(TypedSession(session)))
    }
}

// Cookie parameters and signing key shared by every worker
#[derive(Clone)]
pub struct SessionConfig{
    pub cookie_name: String,
    pub ttl: Duration,
    pub secure: bool,
    key: Key
}

impl SessionConfig {
    pub fn new(settings: &SessionSettings) -> Result<Self, anyhow::Error> {
        let key = Key::try_from(settings.hmac_secret.expose_secret().as_bytes())
            .map_err(|e| anyhow::anyhow!("Session hmac_secret must be at least 64 bytes: {:?}", e))?;

        Ok(SessionConfig{
            cookie_name: settings.cookie_name.clone(),
            ttl: Duration::hours(settings.ttl_hours),
            secure: settings.secure_cookie,
            key
        })
    }

    pub fn middleware(&self, store: PgSessionStore) -> SessionMiddleware<PgSessionStore> {
        SessionMiddleware::builder(store, self.key.clone())
            .cookie_name(self.cookie_name.clone())
            .cookie_path("/".to_string())
            .cookie_http_only(true)
            .cookie_same_site(SameSite::Lax)
            .cookie_secure(self.secure)
            .session_lifecycle(PersistentSession::default().session_ttl(self.ttl))
            .build()
    }
}
