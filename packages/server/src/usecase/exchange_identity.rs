//! UseCase: 外部 ID プロバイダとの認可コード交換
//!
//! ID プロバイダが設定されていない場合は `NotConfigured` を返す。

use std::sync::Arc;

use crate::domain::{IdentityExchange, IdentityProfile, IdentityRequest};

use super::error::ExchangeIdentityError;

/// 認可コード交換のユースケース
pub struct ExchangeIdentityUseCase {
    identity: Option<Arc<dyn IdentityExchange>>,
}

impl ExchangeIdentityUseCase {
    pub fn new(identity: Option<Arc<dyn IdentityExchange>>) -> Self {
        Self { identity }
    }

    /// 認可コードをプロフィールに交換
    pub async fn execute(
        &self,
        code: Option<String>,
        redirect_uri: Option<String>,
    ) -> Result<IdentityProfile, ExchangeIdentityError> {
        let identity = self
            .identity
            .as_ref()
            .ok_or(ExchangeIdentityError::NotConfigured)?;

        let code = code
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or(ExchangeIdentityError::MissingCode)?;
        let redirect_uri = redirect_uri.filter(|uri| !uri.trim().is_empty());

        let profile = identity
            .exchange(&IdentityRequest { code, redirect_uri })
            .await
            .inspect_err(|e| tracing::warn!("Identity exchange failed: {}", e))?;
        tracing::info!("Identity exchange succeeded for '{}'", profile.username);
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IdentityExchangeError, MockIdentityExchange};

    fn usecase_with(identity: MockIdentityExchange) -> ExchangeIdentityUseCase {
        let identity: Arc<dyn IdentityExchange> = Arc::new(identity);
        ExchangeIdentityUseCase::new(Some(identity))
    }

    fn profile() -> IdentityProfile {
        IdentityProfile {
            username: "alice".to_string(),
            id: "42".to_string(),
            avatar: "https://cdn.example/avatars/42/abc.png".to_string(),
        }
    }

    #[tokio::test]
    async fn test_exchange_returns_profile() {
        // テスト項目: 認可コードがプロフィールに交換される
        // given (前提条件):
        let mut identity = MockIdentityExchange::new();
        identity
            .expect_exchange()
            .withf(|request| request.code == "abc" && request.redirect_uri.is_none())
            .times(1)
            .returning(|_| Ok(profile()));
        let usecase = usecase_with(identity);

        // when (操作):
        let result = usecase.execute(Some(" abc ".to_string()), Some(" ".to_string())).await;

        // then (期待する結果):
        assert_eq!(result, Ok(profile()));
    }

    #[tokio::test]
    async fn test_exchange_without_code_is_rejected() {
        // テスト項目: コードが無い場合はプロバイダを呼ばずに MissingCode
        // given (前提条件):
        let mut identity = MockIdentityExchange::new();
        identity.expect_exchange().never();
        let usecase = usecase_with(identity);

        // when (操作):
        let missing = usecase.execute(None, None).await;
        let blank = usecase.execute(Some("  ".to_string()), None).await;

        // then (期待する結果):
        assert_eq!(missing, Err(ExchangeIdentityError::MissingCode));
        assert_eq!(blank, Err(ExchangeIdentityError::MissingCode));
    }

    #[tokio::test]
    async fn test_exchange_failure_is_propagated() {
        // テスト項目: プロバイダの失敗はそのまま返る
        // given (前提条件):
        let mut identity = MockIdentityExchange::new();
        identity
            .expect_exchange()
            .returning(|_| Err(IdentityExchangeError::MissingUsername));
        let usecase = usecase_with(identity);

        // when (操作):
        let result = usecase.execute(Some("abc".to_string()), None).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(ExchangeIdentityError::Exchange(
                IdentityExchangeError::MissingUsername
            ))
        );
    }

    #[tokio::test]
    async fn test_exchange_without_provider() {
        // テスト項目: ID プロバイダ未設定の場合は NotConfigured
        // given (前提条件):
        let usecase = ExchangeIdentityUseCase::new(None);

        // when (操作):
        let result = usecase.execute(Some("abc".to_string()), None).await;

        // then (期待する結果):
        assert_eq!(result, Err(ExchangeIdentityError::NotConfigured));
    }
}
