//! Command handler for the cache shell

use recency::{PutOutcome, SharedCache};
use serde::Serialize;
use tracing::debug;

use crate::reply::Reply;

const HELP: &[&str] = &[
    "SET <key> <value>   store a value, evicting the least recently used key when full",
    "GET <key>           fetch a value and mark it most recently used",
    "ORDER               keys from most to least recently used",
    "SIZE                number of cached entries",
    "CAPACITY            maximum number of entries",
    "STATS               hit/miss/eviction counters as JSON",
    "HELP                this list",
];

/// Counters reported by `STATS`
#[derive(Debug, Serialize)]
struct StatsReport {
    size: usize,
    capacity: usize,
    hits: u64,
    misses: u64,
    inserts: u64,
    updates: u64,
    evictions: u64,
    hit_ratio: f64,
}

pub struct CommandHandler {
    cache: SharedCache<String, String>,
}

impl CommandHandler {
    pub fn new(cache: SharedCache<String, String>) -> Self {
        Self { cache }
    }

    /// Run one command line; `None` for blank lines and `#` comments
    pub fn handle_line(&self, line: &str) -> Option<Reply> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }

        let args: Vec<&str> = line.split_whitespace().collect();
        Some(self.handle(&args))
    }

    pub fn handle(&self, args: &[&str]) -> Reply {
        let Some((command, rest)) = args.split_first() else {
            return Reply::Error("empty command".to_string());
        };

        match command.to_uppercase().as_str() {
            "SET" => self.handle_set(rest),
            "GET" => self.handle_get(rest),
            "ORDER" | "KEYS" => self.handle_order(rest),
            "SIZE" | "DBSIZE" => self.handle_size(rest),
            "CAPACITY" => self.handle_capacity(rest),
            "STATS" | "INFO" => self.handle_stats(rest),
            "HELP" => Reply::Array(HELP.iter().map(|s| s.to_string()).collect()),
            other => Reply::Error(format!("unknown command '{}'", other.to_lowercase())),
        }
    }

    fn handle_set(&self, args: &[&str]) -> Reply {
        // missing key or value reaches the cache as absent and is rejected there
        let key = args.first().map(|k| k.to_string());
        let value = (args.len() > 1).then(|| args[1..].join(" "));

        match self.cache.set(key, value) {
            Ok(PutOutcome::Evicted { key, .. }) => {
                debug!("Evicted key: {}", key);
                Reply::ok()
            }
            Ok(_) => Reply::ok(),
            Err(e) => Reply::Error(e.to_string()),
        }
    }

    fn handle_get(&self, args: &[&str]) -> Reply {
        match args {
            [key] => Reply::Bulk(self.cache.get(*key)),
            _ => wrong_arity("get"),
        }
    }

    fn handle_order(&self, args: &[&str]) -> Reply {
        if !args.is_empty() {
            return wrong_arity("order");
        }
        Reply::Array(self.cache.keys())
    }

    fn handle_size(&self, args: &[&str]) -> Reply {
        if !args.is_empty() {
            return wrong_arity("size");
        }
        Reply::Integer(self.cache.len())
    }

    fn handle_capacity(&self, args: &[&str]) -> Reply {
        if !args.is_empty() {
            return wrong_arity("capacity");
        }
        Reply::Integer(self.cache.capacity())
    }

    fn handle_stats(&self, args: &[&str]) -> Reply {
        if !args.is_empty() {
            return wrong_arity("stats");
        }

        let snapshot = self.cache.stats().snapshot();
        let report = StatsReport {
            size: self.cache.len(),
            capacity: self.cache.capacity(),
            hits: snapshot.hits,
            misses: snapshot.misses,
            inserts: snapshot.inserts,
            updates: snapshot.updates,
            evictions: snapshot.evictions,
            hit_ratio: snapshot.hit_ratio,
        };

        match serde_json::to_string(&report) {
            Ok(json) => Reply::Status(json),
            Err(e) => Reply::Error(format!("failed to encode stats: {}", e)),
        }
    }
}

fn wrong_arity(command: &str) -> Reply {
    Reply::Error(format!(
        "wrong number of arguments for '{}' command",
        command
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handler(capacity: usize) -> CommandHandler {
        CommandHandler::new(SharedCache::new(capacity).unwrap())
    }

    fn order(handler: &CommandHandler) -> Vec<String> {
        match handler.handle(&["ORDER"]) {
            Reply::Array(keys) => keys,
            other => panic!("unexpected reply: {:?}", other),
        }
    }

    #[test]
    fn test_set_and_get() {
        let handler = handler(5);

        assert_eq!(handler.handle(&["SET", "mykey", "myvalue"]), Reply::ok());
        assert_eq!(
            handler.handle(&["get", "mykey"]),
            Reply::Bulk(Some("myvalue".to_string()))
        );
        assert_eq!(handler.handle(&["GET", "other"]), Reply::Bulk(None));
    }

    #[test]
    fn test_set_joins_value_words() {
        let handler = handler(5);

        handler.handle(&["SET", "greeting", "hello", "world"]);
        assert_eq!(
            handler.handle(&["GET", "greeting"]),
            Reply::Bulk(Some("hello world".to_string()))
        );
    }

    #[test]
    fn test_set_missing_arguments() {
        let handler = handler(5);

        assert_eq!(
            handler.handle(&["SET"]),
            Reply::Error("invalid argument: key cannot be absent".to_string())
        );
        assert_eq!(
            handler.handle(&["SET", "k"]),
            Reply::Error("invalid argument: value cannot be absent".to_string())
        );
        assert_eq!(handler.handle(&["SIZE"]), Reply::Integer(0));
    }

    #[test]
    fn test_walkthrough() {
        let handler = handler(5);

        for k in ["1", "2", "3", "4"] {
            handler.handle(&["SET", k, k]);
        }
        assert_eq!(order(&handler), vec!["4", "3", "2", "1"]);

        handler.handle(&["GET", "1"]);
        handler.handle(&["GET", "2"]);
        assert_eq!(handler.handle(&["GET", "9"]), Reply::Bulk(None));
        assert_eq!(order(&handler), vec!["2", "1", "4", "3"]);

        handler.handle(&["SET", "5", "5"]);
        handler.handle(&["SET", "6", "6"]);
        assert_eq!(order(&handler), vec!["6", "5", "2", "1", "4"]);
        assert_eq!(handler.handle(&["GET", "3"]), Reply::Bulk(None));
    }

    #[test]
    fn test_handle_line_skips_comments() {
        let handler = handler(2);

        assert_eq!(handler.handle_line("   "), None);
        assert_eq!(handler.handle_line("# SET a b"), None);
        assert_eq!(handler.handle_line("  size  "), Some(Reply::Integer(0)));
    }

    #[test]
    fn test_stats_json() {
        let handler = handler(2);
        handler.handle(&["SET", "a", "1"]);
        handler.handle(&["GET", "a"]);
        handler.handle(&["GET", "b"]);

        let Reply::Status(json) = handler.handle(&["STATS"]) else {
            panic!("stats should be a status reply");
        };
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["hits"], 1);
        assert_eq!(value["misses"], 1);
        assert_eq!(value["inserts"], 1);
        assert_eq!(value["capacity"], 2);
        assert_eq!(value["hit_ratio"], 0.5);
    }

    #[test]
    fn test_arity_and_unknown() {
        let handler = handler(2);

        assert!(handler.handle(&["GET"]).is_error());
        assert!(handler.handle(&["GET", "a", "b"]).is_error());
        assert!(handler.handle(&["SIZE", "x"]).is_error());
        assert_eq!(
            handler.handle(&["FLY"]),
            Reply::Error("unknown command 'fly'".to_string())
        );
        assert_eq!(handler.handle(&["CAPACITY"]), Reply::Integer(2));
    }
}
