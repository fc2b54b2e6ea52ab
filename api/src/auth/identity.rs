use db::models::node::Model as NodeModel;

/// The authenticated node attached to a request once its bearer token has
/// been verified against the store.
#[derive(Debug, Clone)]
pub struct AuthNode(pub NodeModel);

/// Parsed form of the `{nodeId}:{secret}` bearer token agents send.
#[derive(Debug, Clone)]
pub struct NodeCredentials {
    pub node_id: i64,
    pub api_key: String,
}

impl NodeCredentials {
    /// Splits a bearer token into node id and secret.
    ///
    /// Returns `None` for tokens without a `:` separator, a non-numeric id,
    /// or an empty secret. Callers must not reveal which part was wrong.
    pub fn parse(token: &str) -> Option<Self> {
        let (id, key) = token.split_once(':')?;
        let node_id: i64 = id.parse().ok()?;
        if key.is_empty() {
            return None;
        }
        Some(Self {
            node_id,
            api_key: key.to_owned(),
        })
    }
}
