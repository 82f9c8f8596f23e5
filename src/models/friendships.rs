// A friendship is stored exactly once, keyed by the sorted pair of user ids,
// so the two directions of the relationship can never diverge.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FriendshipRow {
    pub pair_key: String,
    pub user_a: String,
    pub user_b: String,
    pub created_at: String,
}

/// Canonical `"a:b"` key for the unordered pair {a, b}.
pub fn pair_key(a: &str, b: &str) -> String {
    if a <= b {
        format!("{a}:{b}")
    } else {
        format!("{b}:{a}")
    }
}

#[cfg(test)]
mod tests {
    use super::pair_key;

    #[test]
    fn pair_key_ignores_direction() {
        assert_eq!(pair_key("alice", "bob"), pair_key("bob", "alice"));
        assert_eq!(pair_key("bob", "alice"), "alice:bob");
    }

    #[test]
    fn pair_key_orders_lexicographically() {
        assert_eq!(pair_key("b", "a"), "a:b");
        assert_eq!(pair_key("10", "2"), "10:2");
    }
}
