use std::sync::Arc;

use async_trait::async_trait;
use marquee_core::AuthError;
use marquee_domain::{Claims, permissions};

/// Port for validating a bearer token and decoding its claims.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Verifies signature, expiry, audience and issuer; returns the decoded
    /// claims payload unmodified on success.
    async fn verify(&self, token: &str) -> Result<Claims, AuthError>;
}

/// Extracts the raw token from an `Authorization` header value.
///
/// The header must consist of exactly two whitespace-separated parts with a
/// `Bearer` scheme (scheme matching is case-insensitive, as issued headers
/// vary in casing).
pub fn extract_bearer(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthError::MissingHeader)?;
    let parts: Vec<&str> = header.split_whitespace().collect();

    match parts.as_slice() {
        [scheme, token] if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        [scheme, _] => Err(AuthError::MalformedHeader(format!(
            "authorization scheme must be 'Bearer', got '{scheme}'"
        ))),
        [_] => Err(AuthError::MalformedHeader("token not found".to_owned())),
        _ => Err(AuthError::MalformedHeader(
            "authorization header must be a bearer token".to_owned(),
        )),
    }
}

/// Permission gate deciding whether a request may proceed.
///
/// Exactly one of claims or [`AuthError`] results from [`authorize`]; the
/// single designed exception to fatal auth failures is the public read
/// permissions, which degrade to an anonymous fallback payload instead of
/// failing the request.
///
/// [`authorize`]: AccessService::authorize
#[derive(Clone)]
pub struct AccessService {
    verifier: Arc<dyn TokenVerifier>,
    bypass: bool,
}

impl AccessService {
    /// Creates a gate over a verifier. `bypass` disables verification
    /// entirely and must stay off outside local development.
    #[must_use]
    pub fn new(verifier: Arc<dyn TokenVerifier>, bypass: bool) -> Self {
        Self { verifier, bypass }
    }

    /// Authorizes a request that requires `required`, given the raw
    /// `Authorization` header value if one was sent.
    pub async fn authorize(
        &self,
        required: &str,
        authorization: Option<&str>,
    ) -> Result<Claims, AuthError> {
        if self.bypass {
            return Ok(Claims::with_permissions(permissions::ALL));
        }

        // Public read permissions degrade gracefully: any auth failure is
        // swallowed and replaced with the anonymous public payload, while a
        // valid credential keeps its real permission set.
        if permissions::PUBLIC.contains(&required) {
            return match self.verified_claims(authorization).await {
                Ok(claims) => Ok(claims),
                Err(_) => Ok(Claims::with_permissions(permissions::PUBLIC)),
            };
        }

        let claims = self.verified_claims(authorization).await?;

        if !claims.has_permissions_claim() {
            return Err(AuthError::MissingClaim);
        }
        if !claims.permission_set().contains(required) {
            return Err(AuthError::Forbidden);
        }

        Ok(claims)
    }

    async fn verified_claims(&self, authorization: Option<&str>) -> Result<Claims, AuthError> {
        let token = extract_bearer(authorization)?;
        self.verifier.verify(token).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use marquee_core::AuthError;
    use marquee_domain::{Claims, permissions};

    use super::{AccessService, TokenVerifier, extract_bearer};

    #[derive(Default)]
    struct FakeVerifier {
        tokens: HashMap<String, Result<Claims, AuthError>>,
        calls: AtomicUsize,
    }

    impl FakeVerifier {
        fn with_token(token: &str, outcome: Result<Claims, AuthError>) -> Self {
            Self {
                tokens: HashMap::from([(token.to_owned(), outcome)]),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl TokenVerifier for FakeVerifier {
        async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.tokens
                .get(token)
                .cloned()
                .unwrap_or(Err(AuthError::MalformedToken))
        }
    }

    fn gate(verifier: FakeVerifier) -> (AccessService, Arc<FakeVerifier>) {
        let verifier = Arc::new(verifier);
        (AccessService::new(verifier.clone(), false), verifier)
    }

    #[test]
    fn bearer_extraction_accepts_exactly_two_parts() {
        assert_eq!(extract_bearer(Some("Bearer abc")), Ok("abc"));
        assert_eq!(extract_bearer(Some("bearer abc")), Ok("abc"));
        assert_eq!(extract_bearer(None), Err(AuthError::MissingHeader));
        assert!(matches!(
            extract_bearer(Some("Basic abc")),
            Err(AuthError::MalformedHeader(_))
        ));
        assert!(matches!(
            extract_bearer(Some("Bearer")),
            Err(AuthError::MalformedHeader(_))
        ));
        assert!(matches!(
            extract_bearer(Some("Bearer a b")),
            Err(AuthError::MalformedHeader(_))
        ));
    }

    #[tokio::test]
    async fn bypass_grants_every_permission_without_verifying() {
        let verifier = Arc::new(FakeVerifier::default());
        let service = AccessService::new(verifier.clone(), true);

        let claims = service.authorize(permissions::DELETE_USERS, None).await;
        let claims = match claims {
            Ok(claims) => claims,
            Err(error) => panic!("bypass should not fail: {error}"),
        };

        for permission in permissions::ALL {
            assert!(claims.permission_set().contains(permission));
        }
        assert_eq!(verifier.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn public_route_without_credential_gets_the_public_payload() {
        let (service, _) = gate(FakeVerifier::default());

        let claims = service.authorize(permissions::GET_MOVIES, None).await;
        assert_eq!(
            claims.map(|claims| claims.permissions),
            Ok(Some(vec![
                "get:movies".to_owned(),
                "get:actors".to_owned()
            ]))
        );
    }

    #[tokio::test]
    async fn public_route_with_expired_token_falls_back_instead_of_failing() {
        let (service, _) = gate(FakeVerifier::with_token(
            "stale",
            Err(AuthError::TokenExpired),
        ));

        let claims = service
            .authorize(permissions::GET_MOVIES, Some("Bearer stale"))
            .await;
        assert!(claims.is_ok_and(|claims| {
            let set = claims.permission_set();
            set.contains(permissions::GET_MOVIES) && !set.contains(permissions::POST_MOVIES)
        }));
    }

    #[tokio::test]
    async fn public_route_honors_a_valid_credential() {
        let real = Claims::with_permissions(&[permissions::GET_MOVIES, permissions::POST_MOVIES]);
        let (service, _) = gate(FakeVerifier::with_token("good", Ok(real.clone())));

        let claims = service
            .authorize(permissions::GET_MOVIES, Some("Bearer good"))
            .await;
        assert_eq!(claims, Ok(real));
    }

    #[tokio::test]
    async fn protected_route_propagates_auth_failures() {
        let (service, _) = gate(FakeVerifier::with_token(
            "stale",
            Err(AuthError::TokenExpired),
        ));

        let result = service
            .authorize(permissions::POST_MOVIES, Some("Bearer stale"))
            .await;
        assert_eq!(result, Err(AuthError::TokenExpired));

        let result = service.authorize(permissions::POST_MOVIES, None).await;
        assert_eq!(result, Err(AuthError::MissingHeader));
    }

    #[tokio::test]
    async fn missing_permissions_claim_is_not_a_forbidden() {
        let (service, _) = gate(FakeVerifier::with_token("bare", Ok(Claims::default())));

        let result = service
            .authorize(permissions::POST_MOVIES, Some("Bearer bare"))
            .await;
        assert_eq!(result, Err(AuthError::MissingClaim));
    }

    #[tokio::test]
    async fn lacking_the_required_permission_is_forbidden() {
        let claims = Claims::with_permissions(&[permissions::GET_MOVIES]);
        let (service, _) = gate(FakeVerifier::with_token("weak", Ok(claims)));

        let result = service
            .authorize(permissions::POST_MOVIES, Some("Bearer weak"))
            .await;
        assert_eq!(result, Err(AuthError::Forbidden));
    }

    #[tokio::test]
    async fn empty_permission_list_is_forbidden_not_missing_claim() {
        let claims = Claims {
            permissions: Some(Vec::new()),
            ..Claims::default()
        };
        let (service, _) = gate(FakeVerifier::with_token("empty", Ok(claims)));

        let result = service
            .authorize(permissions::POST_MOVIES, Some("Bearer empty"))
            .await;
        assert_eq!(result, Err(AuthError::Forbidden));
    }
}
