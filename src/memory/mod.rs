use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Memory元数据
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryMetadata {
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub data_sizes: HashMap<String, usize>,
    pub total_size: usize,
}

impl Default for MemoryMetadata {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryMetadata {
    pub fn new() -> Self {
        Self {
            created_at: Utc::now(),
            last_updated: Utc::now(),
            data_sizes: HashMap::new(),
            total_size: 0,
        }
    }
}

/// 调查过程中的中间结果存储，键为 `scope:key`
#[derive(Debug, Default)]
pub struct Memory {
    data: HashMap<String, Value>,
    metadata: MemoryMetadata,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    fn full_key(scope: &str, key: &str) -> String {
        format!("{}:{}", scope, key)
    }

    /// 存储数据到指定作用域和键
    pub fn store<T>(&mut self, scope: &str, key: &str, data: T) -> Result<()>
    where
        T: Serialize,
    {
        let full_key = Self::full_key(scope, key);
        let serialized = serde_json::to_value(data)?;
        let data_size = serialized.to_string().len();

        if let Some(old_size) = self.metadata.data_sizes.insert(full_key.clone(), data_size) {
            self.metadata.total_size -= old_size;
        }
        self.metadata.total_size += data_size;
        self.metadata.last_updated = Utc::now();

        self.data.insert(full_key, serialized);
        Ok(())
    }

    /// 从指定作用域和键获取数据
    pub fn get<T>(&self, scope: &str, key: &str) -> Option<T>
    where
        T: for<'a> Deserialize<'a>,
    {
        self.data
            .get(&Self::full_key(scope, key))
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// 列出指定作用域的所有键
    pub fn list_keys(&self, scope: &str) -> Vec<String> {
        let prefix = format!("{}:", scope);
        let mut keys: Vec<String> = self
            .data
            .keys()
            .filter_map(|key| key.strip_prefix(&prefix).map(str::to_string))
            .collect();
        keys.sort();
        keys
    }

    pub fn has_data(&self, scope: &str, key: &str) -> bool {
        self.data.contains_key(&Self::full_key(scope, key))
    }

    /// 清空一个作用域（新一轮调查开始时使用）
    pub fn clear_scope(&mut self, scope: &str) {
        let prefix = format!("{}:", scope);
        self.data.retain(|key, _| !key.starts_with(&prefix));

        let mut removed = 0;
        self.metadata.data_sizes.retain(|key, size| {
            if key.starts_with(&prefix) {
                removed += *size;
                false
            } else {
                true
            }
        });
        self.metadata.total_size -= removed;
        self.metadata.last_updated = Utc::now();
    }

    pub fn total_size(&self) -> usize {
        self.metadata.total_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_and_get() {
        let mut memory = Memory::new();
        memory.store("research", "OfficialInfoResearcher", "要綱").unwrap();

        assert!(memory.has_data("research", "OfficialInfoResearcher"));
        assert_eq!(
            memory.get::<String>("research", "OfficialInfoResearcher"),
            Some("要綱".to_string())
        );
        assert_eq!(memory.get::<String>("research", "missing"), None);
    }

    #[test]
    fn test_overwrite_keeps_size_consistent() {
        let mut memory = Memory::new();
        memory.store("s", "k", "aaaa").unwrap();
        let first = memory.total_size();
        memory.store("s", "k", "aaaa").unwrap();
        assert_eq!(memory.total_size(), first);
    }

    #[test]
    fn test_clear_scope_only_removes_that_scope() {
        let mut memory = Memory::new();
        memory.store("a", "1", 1).unwrap();
        memory.store("a", "2", 2).unwrap();
        memory.store("b", "1", 3).unwrap();

        memory.clear_scope("a");

        assert!(memory.list_keys("a").is_empty());
        assert_eq!(memory.list_keys("b"), vec!["1".to_string()]);
        assert_eq!(memory.total_size(), "3".len());
    }
}
