//! InMemory MembershipSet 実装
//!
//! ドメイン層が定義する MembershipSet trait の具体的な実装。
//! HashMap を tokio の Mutex で保護して使用します。
//!
//! `each` はロック中にスナップショットを取り、ロックを解放してから
//! visitor を呼び出します。visitor 内から `remove` などを呼んでも
//! デッドロックしません。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{MemberId, MemberRef, MembershipError, MembershipSet};

/// インメモリ MembershipSet 実装
#[derive(Default)]
pub struct InMemoryMembershipSet {
    /// 参加中のメンバー（MemberId をキーとする）
    members: Mutex<HashMap<MemberId, MemberRef>>,
}

impl InMemoryMembershipSet {
    /// 新しい InMemoryMembershipSet を作成
    pub fn new() -> Self {
        Self::default()
    }

    async fn snapshot(&self) -> Vec<MemberRef> {
        let members = self.members.lock().await;
        members.values().cloned().collect()
    }
}

#[async_trait]
impl MembershipSet for InMemoryMembershipSet {
    async fn add(&self, member: MemberRef) -> Result<(), MembershipError> {
        let id = member.id();
        let mut members = self.members.lock().await;
        if members.contains_key(&id) {
            return Err(MembershipError::Duplicate { id });
        }
        members.insert(id, member);
        Ok(())
    }

    async fn remove(&self, id: MemberId) -> Result<(), MembershipError> {
        let mut members = self.members.lock().await;
        members
            .remove(&id)
            .map(|_| ())
            .ok_or(MembershipError::NotFound { id })
    }

    async fn each(&self, visit: &mut (dyn for<'m> FnMut(&'m MemberRef) + Send)) {
        for member in self.snapshot().await {
            visit(&member);
        }
    }

    async fn clear(&self) {
        let mut members = self.members.lock().await;
        members.clear();
    }

    async fn len(&self) -> usize {
        let members = self.members.lock().await;
        members.len()
    }

    async fn list_by_prefix(&self, prefix: &str) -> Vec<MemberRef> {
        let members = self.members.lock().await;
        members
            .values()
            .filter(|member| member.name().as_str().starts_with(prefix))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::transport::MpscMember;
    use std::sync::Arc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - InMemoryMembershipSet の add / remove / each / clear / list_by_prefix
    // - 同一性（MemberId）による重複判定
    //
    // 【なぜこのテストが必要か】
    // - Channel のブロードキャストは each のスナップショットにのみ依存する
    // - 重複・不在エラーは Join / Leave の呼び出し元にそのまま伝播される
    // ========================================

    fn member(name: &str) -> MemberRef {
        let (member, _receiver) = MpscMember::with_name(name, 8).unwrap();
        member
    }

    #[tokio::test]
    async fn test_add_member_success() {
        // テスト項目: メンバーを追加できる
        // given (前提条件):
        let set = InMemoryMembershipSet::new();

        // when (操作):
        let result = set.add(member("alice")).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(set.len().await, 1);
        assert!(!set.is_empty().await);
    }

    #[tokio::test]
    async fn test_add_duplicate_member_fails() {
        // テスト項目: 同じメンバー（同一 ID）の二重追加はエラーになる
        // given (前提条件):
        let set = InMemoryMembershipSet::new();
        let alice = member("alice");
        set.add(alice.clone()).await.unwrap();

        // when (操作):
        let result = set.add(alice.clone()).await;

        // then (期待する結果):
        assert_eq!(result, Err(MembershipError::Duplicate { id: alice.id() }));
        assert_eq!(set.len().await, 1);
    }

    #[tokio::test]
    async fn test_add_same_name_different_identity() {
        // テスト項目: 同名でも別接続のメンバーは両方追加できる
        // given (前提条件):
        let set = InMemoryMembershipSet::new();

        // when (操作):
        set.add(member("alice")).await.unwrap();
        let result = set.add(member("alice")).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(set.len().await, 2);
    }

    #[tokio::test]
    async fn test_remove_nonexistent_member_fails() {
        // テスト項目: 存在しないメンバーの削除はエラーになる
        // given (前提条件):
        let set = InMemoryMembershipSet::new();
        let alice = member("alice");

        // when (操作):
        let result = set.remove(alice.id()).await;

        // then (期待する結果):
        assert_eq!(result, Err(MembershipError::NotFound { id: alice.id() }));
    }

    #[tokio::test]
    async fn test_each_visits_snapshot() {
        // テスト項目: each で全メンバーを訪問でき、訪問後に削除できる
        // given (前提条件):
        let set = Arc::new(InMemoryMembershipSet::new());
        set.add(member("alice")).await.unwrap();
        set.add(member("bob")).await.unwrap();

        // when (操作):
        let mut visited = Vec::new();
        set.each(&mut |m: &MemberRef| visited.push(m.clone())).await;
        for m in &visited {
            set.remove(m.id()).await.unwrap();
        }

        // then (期待する結果):
        assert_eq!(visited.len(), 2);
        assert_eq!(set.len().await, 0);
    }

    #[tokio::test]
    async fn test_list_by_prefix() {
        // テスト項目: 表示名の前方一致でメンバーを取得できる
        // given (前提条件):
        let set = InMemoryMembershipSet::new();
        set.add(member("alice")).await.unwrap();
        set.add(member("alicia")).await.unwrap();
        set.add(member("bob")).await.unwrap();

        // when (操作):
        let mut names: Vec<String> = set
            .list_by_prefix("ali")
            .await
            .iter()
            .map(|m| m.name().into_string())
            .collect();
        names.sort();

        // then (期待する結果):
        assert_eq!(names, vec!["alice".to_string(), "alicia".to_string()]);
        assert_eq!(set.list_by_prefix("").await.len(), 3);
        assert!(set.list_by_prefix("zed").await.is_empty());
    }

    #[tokio::test]
    async fn test_clear() {
        // テスト項目: clear で全メンバーが削除される
        // given (前提条件):
        let set = InMemoryMembershipSet::new();
        set.add(member("alice")).await.unwrap();
        set.add(member("bob")).await.unwrap();

        // when (操作):
        set.clear().await;

        // then (期待する結果):
        assert!(set.is_empty().await);
    }

    #[tokio::test]
    async fn test_concurrent_add() {
        // テスト項目: 複数タスクからの同時追加が全て反映される
        // given (前提条件):
        let set = Arc::new(InMemoryMembershipSet::new());

        // when (操作):
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let set = set.clone();
                tokio::spawn(async move { set.add(member(&format!("user{i}"))).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        // then (期待する結果):
        assert_eq!(set.len().await, 16);
    }
}
