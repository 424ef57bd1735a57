//! Shared fixtures for integration tests.
//!
//! - RSA key pairs (`tests/fixtures/*.pem`) with their public JWK components
//! - token builders (properly signed, tampered, or forged with any header)
//! - a mock JWKS endpoint that counts fetches
//! - an in-memory `DrinkRepo`

#![allow(dead_code)]

use std::{
    net::SocketAddr,
    sync::{
        Arc, Mutex, RwLock,
        atomic::{AtomicU16, AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use drinks_api::{
    repos::{Drink, DrinkRepo, Ingredient, RepoError},
    services::auth::{Authorizer, StaticKeySet, TokenPolicy, TokenVerifier},
};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{Value, json};
use tokio::task::JoinHandle;

pub const ISSUER: &str = "https://drinks-test.eu.auth0.com/";
pub const AUDIENCE: &str = "drinks";
pub const SUBJECT: &str = "auth0|barista";

pub const PRIMARY_KID: &str = "primary-2024";
pub const PRIMARY_PEM: &str = include_str!("../fixtures/primary_rsa.pem");
pub const PRIMARY_N: &str = "1TgzpMtL-ipwk1ndHzsdwTi5vWcQT6SKppx9FEpDJv06OKZdFOigJ0OCDFnHg-oXYfvg6ypTImbpCSqAwv6Q1UGJqkKwu2sWg_JtnenZwg2YgLi56DvNlXRHMtpzsxHJEwG90yLC0tTR2Awer-rL5jQvz3uYdedUV0lkZ1M-WEP-eSjwBf9dL5fKDdeAgynroxtEU5Iczgz5LnmArTZYoQs69tPZy3ueDyyXTC2yTQ8UtczQM96GqNVBfhquxTg34lm8DvtSPj7-4vJVfBIy-d76aEhzp-oVFQA50bjvrexpNQtCRHcW0ILNb8WMsKHc5lhQSFJSkx4LBqP1tLZMkQ";

/// Not published in the default key set.
pub const ROGUE_KID: &str = "rogue-1";
pub const ROGUE_PEM: &str = include_str!("../fixtures/rogue_rsa.pem");
pub const ROGUE_N: &str = "n28_yDcaqALeVNvXIqR-1AN7HE9PBOS-T1pQKi1S853fg7WN2VSh_TIIEODH9Kk8oPbSegmzA3v0LdsLPHoMrvpgBfMARzQm7AVqx-gzbdrBK7a3K0AdkRk9zhej2bPmqZqVtdRGSm39iC2PZDVygI4--kWE_xsHul7uWoCATAFB849RP1QwPWpSQXVY3Umq4vrwun2oa_GAtt9-Foze3KaEewHLEaxrXO2G1QPRmYbzp0sgxQERGQDaDGf1Ckm9rxFl_7frOmJKBGY_Jc6qSIwkE5ovPpk42ImiurqfjAZNnGA3JXIm6VStjWxGMc6Q5W1xPfkzLy4So1c_xiPG4w";

pub const RSA_E: &str = "AQAB";

pub fn now() -> u64 {
    chrono::Utc::now().timestamp() as u64
}

// ---------- keys ----------

pub fn rsa_jwk(kid: &str, n: &str) -> Value {
    json!({ "kty": "RSA", "use": "sig", "alg": "RS256", "kid": kid, "n": n, "e": RSA_E })
}

pub fn jwks(keys: Vec<Value>) -> Value {
    json!({ "keys": keys })
}

pub fn primary_jwks() -> Value {
    jwks(vec![rsa_jwk(PRIMARY_KID, PRIMARY_N)])
}

pub fn static_keys(set: &Value) -> StaticKeySet {
    StaticKeySet::from_json(&set.to_string()).expect("valid jwks fixture")
}

pub fn policy() -> TokenPolicy {
    TokenPolicy::new(ISSUER, AUDIENCE)
}

pub fn authorizer_with(policy: TokenPolicy, set: &Value) -> Authorizer {
    Authorizer::new(TokenVerifier::new(policy, Arc::new(static_keys(set))))
}

pub fn authorizer() -> Authorizer {
    authorizer_with(policy(), &primary_jwks())
}

// ---------- tokens ----------

pub fn claims(permissions: &[&str]) -> Value {
    let now = now();
    json!({
        "iss": ISSUER,
        "sub": SUBJECT,
        "aud": [AUDIENCE, format!("{ISSUER}userinfo")],
        "iat": now,
        "exp": now + 3600,
        "azp": "coffee-shop-frontend",
        "permissions": permissions,
    })
}

pub fn sign_with(alg: Algorithm, kid: Option<&str>, pem: &str, claims: &Value) -> String {
    let mut header = Header::new(alg);
    header.kid = kid.map(str::to_string);
    let key = EncodingKey::from_rsa_pem(pem.as_bytes()).expect("valid rsa fixture");
    jsonwebtoken::encode(&header, claims, &key).expect("failed to sign token")
}

/// RS256, primary key, primary kid.
pub fn sign(claims: &Value) -> String {
    sign_with(Algorithm::RS256, Some(PRIMARY_KID), PRIMARY_PEM, claims)
}

pub fn token(permissions: &[&str]) -> String {
    sign(&claims(permissions))
}

fn b64(value: &Value) -> String {
    URL_SAFE_NO_PAD.encode(value.to_string())
}

/// Arbitrary header + claims with a junk signature.
pub fn forge(header: &Value, claims: &Value) -> String {
    format!("{}.{}.{}", b64(header), b64(claims), URL_SAFE_NO_PAD.encode(b"not-a-signature"))
}

/// Keep header and signature of `token`, swap the payload.
pub fn swap_payload(token: &str, claims: &Value) -> String {
    let parts: Vec<&str> = token.split('.').collect();
    format!("{}.{}.{}", parts[0], b64(claims), parts[2])
}

pub fn bearer(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
    );
    headers
}

// ---------- mock JWKS endpoint ----------

#[derive(Clone)]
struct MockJwksState {
    document: Arc<RwLock<Value>>,
    status: Arc<AtomicU16>,
    hits: Arc<AtomicUsize>,
    delay: Duration,
}

async fn jwks_handler(State(state): State<MockJwksState>) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }

    let status = StatusCode::from_u16(state.status.load(Ordering::SeqCst)).unwrap();
    if !status.is_success() {
        return (status, "upstream unavailable").into_response();
    }

    let document = state.document.read().unwrap().clone();
    Json(document).into_response()
}

/// JWKS endpoint on an ephemeral port.
pub struct MockJwks {
    pub url: url::Url,
    state: MockJwksState,
    _handle: JoinHandle<()>,
}

impl MockJwks {
    pub async fn start(document: Value) -> Self {
        Self::start_with_delay(document, Duration::ZERO).await
    }

    /// Each response is held back by `delay`, so concurrent callers overlap.
    pub async fn start_with_delay(document: Value, delay: Duration) -> Self {
        let state = MockJwksState {
            document: Arc::new(RwLock::new(document)),
            status: Arc::new(AtomicU16::new(200)),
            hits: Arc::new(AtomicUsize::new(0)),
            delay,
        };

        let app = Router::new()
            .route("/.well-known/jwks.json", get(jwks_handler))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: url::Url::parse(&format!("http://{addr}/.well-known/jwks.json")).unwrap(),
            state,
            _handle: handle,
        }
    }

    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    pub fn publish(&self, document: Value) {
        *self.state.document.write().unwrap() = document;
    }

    pub fn respond_with(&self, status: StatusCode) {
        self.state.status.store(status.as_u16(), Ordering::SeqCst);
    }
}

// ---------- in-memory repo ----------

#[derive(Default)]
pub struct MemoryDrinkRepo {
    drinks: Mutex<Vec<Drink>>,
    next_id: AtomicUsize,
}

impl MemoryDrinkRepo {
    pub fn with(drinks: Vec<(&str, Vec<Ingredient>)>) -> Self {
        let repo = Self::default();
        for (title, recipe) in drinks {
            repo.insert(title, recipe).unwrap();
        }
        repo
    }

    fn insert(&self, title: &str, recipe: Vec<Ingredient>) -> Result<Drink, RepoError> {
        let mut drinks = self.drinks.lock().unwrap();
        if drinks.iter().any(|d| d.title == title) {
            return Err(RepoError::Conflict);
        }
        let drink = Drink {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) as i32 + 1,
            title: title.to_string(),
            recipe,
        };
        drinks.push(drink.clone());
        Ok(drink)
    }

    pub fn titles(&self) -> Vec<String> {
        self.drinks
            .lock()
            .unwrap()
            .iter()
            .map(|d| d.title.clone())
            .collect()
    }
}

#[async_trait]
impl DrinkRepo for MemoryDrinkRepo {
    async fn list(&self) -> Result<Vec<Drink>, RepoError> {
        Ok(self.drinks.lock().unwrap().clone())
    }

    async fn create(&self, title: &str, recipe: &[Ingredient]) -> Result<Drink, RepoError> {
        self.insert(title, recipe.to_vec())
    }

    async fn update(
        &self,
        id: i32,
        title: Option<&str>,
        recipe: Option<&[Ingredient]>,
    ) -> Result<Option<Drink>, RepoError> {
        let mut drinks = self.drinks.lock().unwrap();
        if let Some(title) = title
            && drinks.iter().any(|d| d.title == title && d.id != id)
        {
            return Err(RepoError::Conflict);
        }

        let Some(drink) = drinks.iter_mut().find(|d| d.id == id) else {
            return Ok(None);
        };
        if let Some(title) = title {
            drink.title = title.to_string();
        }
        if let Some(recipe) = recipe {
            drink.recipe = recipe.to_vec();
        }
        Ok(Some(drink.clone()))
    }

    async fn delete(&self, id: i32) -> Result<bool, RepoError> {
        let mut drinks = self.drinks.lock().unwrap();
        let before = drinks.len();
        drinks.retain(|d| d.id != id);
        Ok(drinks.len() < before)
    }
}

pub fn ingredient(name: &str, color: &str, parts: u32) -> Ingredient {
    Ingredient {
        name: name.to_string(),
        color: color.to_string(),
        parts,
    }
}
