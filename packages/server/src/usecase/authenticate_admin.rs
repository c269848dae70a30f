//! UseCase: admin 認証処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - AuthenticateAdminUseCase::execute() メソッド
//! - 共有シークレットとの比較、権限の昇格、結果の返信
//!
//! ### なぜこのテストが必要か
//! - 認証結果は要求した接続にだけ返す必要がある（他の接続には何も送らない）
//! - 不一致の場合に権限が変わらないこと、既に admin の接続が降格しないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：シークレット一致で昇格
//! - 異常系：シークレット不一致（空文字を含む）
//! - エッジケース：admin が再度誤ったシークレットを送る

use std::sync::Arc;

use ring::hmac;
use secrecy::{ExposeSecret, SecretString};

use crate::domain::{ConnectionId, MessagePusher, SessionEvent, SessionRepository};

use super::error::AuthenticateError;

/// シークレット比較用の HMAC 鍵
const COMPARISON_KEY: &[u8] = b"watchparty-admin-secret";

/// admin 認証のユースケース
pub struct AuthenticateAdminUseCase {
    repository: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    comparison_key: hmac::Key,
    /// 共有シークレットの HMAC タグ（空のシークレットなら None で、何とも一致しない）
    expected_tag: Option<hmac::Tag>,
}

impl AuthenticateAdminUseCase {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        admin_secret: SecretString,
    ) -> Self {
        let comparison_key = hmac::Key::new(hmac::HMAC_SHA256, COMPARISON_KEY);
        let secret = admin_secret.expose_secret().as_bytes();
        let expected_tag = (!secret.is_empty()).then(|| hmac::sign(&comparison_key, secret));
        Self {
            repository,
            message_pusher,
            comparison_key,
            expected_tag,
        }
    }

    /// admin 認証を実行
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - シークレット一致（接続は Privileged に昇格済み）
    /// * `Ok(false)` - シークレット不一致（権限は変更なし）
    /// * `Err(AuthenticateError)` - 接続が存在しない、または返信に失敗
    pub async fn execute(
        &self,
        id: &ConnectionId,
        candidate: &str,
    ) -> Result<bool, AuthenticateError> {
        let success = self.matches(candidate);

        if success {
            self.repository
                .grant_privilege(id)
                .await
                .map_err(|_| AuthenticateError::ConnectionNotFound(id.to_string()))?;
            tracing::info!("Connection '{}' is now privileged", id);
        } else {
            tracing::info!("Connection '{}' failed admin authentication", id);
        }

        self.message_pusher
            .push_to(id, &SessionEvent::AdminResult(success))
            .await?;

        Ok(success)
    }

    /// 定数時間比較（`hmac::verify` がタグを定数時間で比較する）
    fn matches(&self, candidate: &str) -> bool {
        let Some(expected) = &self.expected_tag else {
            return false;
        };
        hmac::verify(&self.comparison_key, candidate.as_bytes(), expected.as_ref()).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::MockMessagePusher,
        usecase::{
            CommandSequencer,
            test_support::{
                TEST_SECRET, connect_viewer, create_test_message_pusher, create_test_repository,
            },
        },
    };

    #[tokio::test]
    async fn test_authenticate_with_correct_secret() {
        // テスト項目: 正しいシークレットで昇格し、要求した接続にだけ成功が返る
        // given (前提条件):
        let repository = create_test_repository();
        let message_pusher = create_test_message_pusher();
        let sequencer = Arc::new(CommandSequencer::new());
        let mut requester =
            connect_viewer(repository.clone(), message_pusher.clone(), sequencer.clone()).await;
        let mut bystander =
            connect_viewer(repository.clone(), message_pusher.clone(), sequencer).await;
        requester.drain();
        bystander.drain();
        let usecase = AuthenticateAdminUseCase::new(
            repository.clone(),
            message_pusher,
            SecretString::from(TEST_SECRET),
        );

        // when (操作):
        let result = usecase.execute(&requester.id, TEST_SECRET).await;

        // then (期待する結果):
        assert_eq!(result, Ok(true));
        assert_eq!(
            requester.drain(),
            vec![serde_json::json!({"type": "admin_success", "success": true})]
        );
        assert!(bystander.drain().is_empty());
        let connection = repository.get_connection(&requester.id).await.unwrap();
        assert!(connection.is_privileged());
    }

    #[tokio::test]
    async fn test_authenticate_with_wrong_secret() {
        // テスト項目: 誤ったシークレット（空文字を含む）では昇格せず、失敗が返る
        // given (前提条件):
        let repository = create_test_repository();
        let message_pusher = create_test_message_pusher();
        let mut requester = connect_viewer(
            repository.clone(),
            message_pusher.clone(),
            Arc::new(CommandSequencer::new()),
        )
        .await;
        requester.drain();
        let usecase = AuthenticateAdminUseCase::new(
            repository.clone(),
            message_pusher,
            SecretString::from(TEST_SECRET),
        );

        let candidates = [
            "wrong".to_string(),
            String::new(),
            format!("{}!", TEST_SECRET),
            format!("{}\0", TEST_SECRET),
            TEST_SECRET[..TEST_SECRET.len() - 1].to_string(),
            TEST_SECRET.to_uppercase(),
        ];
        for candidate in &candidates {
            // when (操作):
            let result = usecase.execute(&requester.id, candidate).await;

            // then (期待する結果):
            assert_eq!(result, Ok(false));
            assert_eq!(
                requester.drain(),
                vec![serde_json::json!({"type": "admin_success", "success": false})]
            );
        }
        let connection = repository.get_connection(&requester.id).await.unwrap();
        assert!(!connection.is_privileged());
    }

    #[tokio::test]
    async fn test_admin_is_not_demoted_by_wrong_secret() {
        // テスト項目: admin が誤ったシークレットを送っても権限は維持される
        // given (前提条件):
        let repository = create_test_repository();
        let message_pusher = create_test_message_pusher();
        let requester = connect_viewer(
            repository.clone(),
            message_pusher.clone(),
            Arc::new(CommandSequencer::new()),
        )
        .await;
        let usecase = AuthenticateAdminUseCase::new(
            repository.clone(),
            message_pusher,
            SecretString::from(TEST_SECRET),
        );
        assert_eq!(usecase.execute(&requester.id, TEST_SECRET).await, Ok(true));

        // when (操作):
        let result = usecase.execute(&requester.id, "wrong").await;

        // then (期待する結果):
        assert_eq!(result, Ok(false));
        let connection = repository.get_connection(&requester.id).await.unwrap();
        assert!(connection.is_privileged());
    }

    #[tokio::test]
    async fn test_authenticate_unknown_connection() {
        // テスト項目: 存在しない接続からの認証は、返信せずにエラーになる
        // given (前提条件):
        let repository = create_test_repository();
        let mut message_pusher = MockMessagePusher::new();
        message_pusher.expect_push_to().never();
        message_pusher.expect_broadcast().never();
        let usecase = AuthenticateAdminUseCase::new(
            repository,
            Arc::new(message_pusher),
            SecretString::from(TEST_SECRET),
        );
        let unknown = crate::domain::ConnectionIdFactory::generate();

        // when (操作):
        let result = usecase.execute(&unknown, TEST_SECRET).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(AuthenticateError::ConnectionNotFound(unknown.to_string()))
        );
    }

    #[tokio::test]
    async fn test_empty_admin_secret_never_matches() {
        // テスト項目: 共有シークレットが空の場合、空文字を含むどの入力でも昇格しない
        // given (前提条件):
        let repository = create_test_repository();
        let message_pusher = create_test_message_pusher();
        let mut requester = connect_viewer(
            repository.clone(),
            message_pusher.clone(),
            Arc::new(CommandSequencer::new()),
        )
        .await;
        requester.drain();
        let usecase =
            AuthenticateAdminUseCase::new(repository.clone(), message_pusher, SecretString::from(""));

        // when (操作):
        let empty = usecase.execute(&requester.id, "").await;
        let other = usecase.execute(&requester.id, TEST_SECRET).await;

        // then (期待する結果):
        assert_eq!((empty, other), (Ok(false), Ok(false)));
        let connection = repository.get_connection(&requester.id).await.unwrap();
        assert!(!connection.is_privileged());
    }
}
