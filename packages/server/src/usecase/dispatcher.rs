//! UseCase: イベント配信
//!
//! Room の操作が返した [`Outbound`] を、ロック解放後に取得したメンバーの
//! スナップショットに対して解決し、MessagePusher に渡す。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - EventDispatcher::dispatch() の宛先解決（Members / MembersExcept / Only）
//! - 単一宛先への送信失敗が他の配信を止めないこと
//!
//! ### どのような状況を想定しているか
//! - 正常系：全員・送信者以外・単一接続への配信
//! - 異常系：すでに切断された接続への返信

use std::sync::Arc;

use crate::domain::{Audience, ConnectionId, MessagePusher, Outbound, ServerEvent};

/// Room イベントの配信役
#[derive(Clone)]
pub struct EventDispatcher {
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl EventDispatcher {
    /// 新しい EventDispatcher を作成
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// イベントを順番に配信する
    ///
    /// # Arguments
    ///
    /// * `members` - ロック中に取得した Room メンバーのスナップショット
    /// * `outbound` - Room の操作が返したイベント（配信順）
    ///
    /// # Returns
    ///
    /// 実際にキューへ積めた件数の合計
    pub async fn dispatch(&self, members: &[ConnectionId], outbound: Vec<Outbound>) -> usize {
        let mut delivered = 0;
        for Outbound { audience, event } in outbound {
            delivered += match audience {
                Audience::Members => self.message_pusher.broadcast(members.to_vec(), &event).await,
                Audience::MembersExcept(excluded) => {
                    let targets = members
                        .iter()
                        .copied()
                        .filter(|id| *id != excluded)
                        .collect();
                    self.message_pusher.broadcast(targets, &event).await
                }
                Audience::Only(connection_id) => {
                    usize::from(self.reply(&connection_id, &event).await)
                }
            };
        }
        delivered
    }

    /// 1 つの接続にだけ送信する。切断済みなら debug ログを出して false を返す。
    pub async fn reply(&self, connection_id: &ConnectionId, event: &ServerEvent) -> bool {
        match self.message_pusher.push_to(connection_id, event).await {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!("Dropped reply to '{}': {}", connection_id, e);
                false
            }
        }
    }

    /// 登録中の全接続に送信する（シャットダウン通知用）
    pub async fn announce(&self, event: &ServerEvent) -> usize {
        self.message_pusher.broadcast_all(event).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MessagePushError, message_pusher::MockMessagePusher};

    fn count_event(count: usize) -> ServerEvent {
        ServerEvent::ParticipantCount { count }
    }

    #[tokio::test]
    async fn test_dispatch_to_members() {
        // テスト項目: Members 宛てのイベントはスナップショットの全員に届く
        // given (前提条件):
        let alice = ConnectionId::generate();
        let bob = ConnectionId::generate();
        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_broadcast()
            .withf(move |targets, event| {
                targets == &vec![alice, bob] && *event == count_event(2)
            })
            .times(1)
            .returning(|targets, _| targets.len());
        let dispatcher = EventDispatcher::new(Arc::new(pusher));

        // when (操作):
        let delivered = dispatcher
            .dispatch(&[alice, bob], vec![Outbound::to_members(count_event(2))])
            .await;

        // then (期待する結果):
        assert_eq!(delivered, 2);
    }

    #[tokio::test]
    async fn test_dispatch_to_members_except_sender() {
        // テスト項目: MembersExcept 宛てのイベントは送信者を除いたメンバーに届く
        // given (前提条件):
        let alice = ConnectionId::generate();
        let bob = ConnectionId::generate();
        let charlie = ConnectionId::generate();
        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_broadcast()
            .withf(move |targets, _| targets == &vec![bob, charlie])
            .times(1)
            .returning(|targets, _| targets.len());
        let dispatcher = EventDispatcher::new(Arc::new(pusher));

        // when (操作):
        let delivered = dispatcher
            .dispatch(
                &[alice, bob, charlie],
                vec![Outbound::to_members_except(alice, count_event(3))],
            )
            .await;

        // then (期待する結果):
        assert_eq!(delivered, 2);
    }

    #[tokio::test]
    async fn test_dispatch_preserves_order_and_tolerates_dead_reply() {
        // テスト項目: 単一宛ての送信に失敗しても後続のイベントは配信される
        // given (前提条件):
        let alice = ConnectionId::generate();
        let mut seq = mockall::Sequence::new();
        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_push_to()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|id, _| Err(MessagePushError::ClientNotFound(id.to_string())));
        pusher
            .expect_broadcast()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|targets, _| targets.len());
        let dispatcher = EventDispatcher::new(Arc::new(pusher));

        // when (操作):
        let delivered = dispatcher
            .dispatch(
                &[alice],
                vec![
                    Outbound::to_connection(alice, ServerEvent::error("Room not found")),
                    Outbound::to_members(count_event(1)),
                ],
            )
            .await;

        // then (期待する結果):
        assert_eq!(delivered, 1);
    }

    #[tokio::test]
    async fn test_announce_uses_broadcast_all() {
        // テスト項目: announce は登録中の全接続への一斉送信になる
        // given (前提条件):
        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_broadcast_all()
            .withf(|event| matches!(event, ServerEvent::ServerShutdown { .. }))
            .times(1)
            .returning(|_| 5);
        let dispatcher = EventDispatcher::new(Arc::new(pusher));

        // when (操作):
        let delivered = dispatcher
            .announce(&ServerEvent::ServerShutdown {
                message: "bye".to_string(),
            })
            .await;

        // then (期待する結果):
        assert_eq!(delivered, 5);
    }
}
