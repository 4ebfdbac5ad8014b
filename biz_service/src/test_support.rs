//! 内存版 `Repository`，按 MongoDB 的匹配规则执行过滤与 `$set` 更新，供单元测试使用。

use async_trait::async_trait;
use common::repository_util::{Repository, UpdateCount};
use mongodb::bson::{self, Bson, Document};
use serde::{de::DeserializeOwned, Serialize};
use std::io;
use std::marker::PhantomData;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

pub struct MemoryRepository<T> {
    docs: Mutex<Vec<Document>>,
    failing: AtomicBool,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self { docs: Mutex::new(vec![]), failing: AtomicBool::new(false), _marker: PhantomData }
    }
}

impl<T> MemoryRepository<T> {
    /// 之后的所有调用都返回存储层错误
    pub fn fail_all(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    fn check_available(&self) -> mongodb::error::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            let offline = io::Error::new(io::ErrorKind::ConnectionRefused, "store offline");
            return Err(mongodb::error::Error::from(offline));
        }
        Ok(())
    }
}

#[async_trait]
impl<T> Repository<T> for MemoryRepository<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    async fn insert(&self, entity: &T) -> mongodb::error::Result<()> {
        self.check_available()?;
        let doc = bson::to_document(entity).expect("entity serializes to a document");
        self.docs.lock().unwrap().push(doc);
        Ok(())
    }

    async fn find_one(&self, filter: Document) -> mongodb::error::Result<Option<T>> {
        self.check_available()?;
        let docs = self.docs.lock().unwrap();
        let found = docs.iter().find(|doc| matches(doc, &filter)).cloned();
        Ok(found.map(|doc| bson::from_document(doc).expect("stored document deserializes")))
    }

    async fn update_one(&self, filter: Document, update: Document) -> mongodb::error::Result<UpdateCount> {
        self.check_available()?;
        let mut docs = self.docs.lock().unwrap();
        let Some(doc) = docs.iter_mut().find(|doc| matches(doc, &filter)) else {
            return Ok(UpdateCount::default());
        };
        let before = doc.clone();
        if let Ok(set) = update.get_document("$set") {
            for (path, value) in set {
                set_path(doc, path, value.clone());
            }
        }
        let modified = if *doc == before { 0 } else { 1 };
        Ok(UpdateCount { matched: 1, modified })
    }
}

fn matches(doc: &Document, filter: &Document) -> bool {
    filter.iter().all(|(key, expected)| match key.as_str() {
        "$and" => sub_filters(expected).iter().all(|f| matches(doc, f)),
        "$or" => sub_filters(expected).iter().any(|f| matches(doc, f)),
        path => {
            let mut values = vec![];
            collect_path(&Bson::Document(doc.clone()), path, &mut values);
            values.iter().any(|v| match v {
                Bson::Array(items) => v == expected || items.contains(expected),
                _ => v == expected,
            })
        }
    })
}

fn sub_filters(value: &Bson) -> Vec<Document> {
    match value {
        Bson::Array(items) => items.iter().filter_map(|b| b.as_document().cloned()).collect(),
        _ => vec![],
    }
}

/// 按点号路径取值，遇到数组时展开到每个元素
fn collect_path(value: &Bson, path: &str, out: &mut Vec<Bson>) {
    let (head, rest) = match path.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (path, None),
    };
    match value {
        Bson::Document(doc) => {
            if let Some(next) = doc.get(head) {
                match rest {
                    Some(rest) => collect_path(next, rest, out),
                    None => out.push(next.clone()),
                }
            }
        }
        Bson::Array(items) => {
            for item in items {
                collect_path(item, path, out);
            }
        }
        _ => {}
    }
}

fn set_path(doc: &mut Document, path: &str, value: Bson) {
    match path.split_once('.') {
        Some((head, rest)) => {
            if !matches!(doc.get(head), Some(Bson::Document(_))) {
                doc.insert(head, Document::new());
            }
            if let Some(Bson::Document(child)) = doc.get_mut(head) {
                set_path(child, rest, value);
            }
        }
        None => {
            doc.insert(path, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn dotted_paths_reach_into_arrays() {
        let stored = doc! { "profile": { "friends": [{ "nickname": "lee" }, { "nickname": "park" }] } };
        assert!(matches(&stored, &doc! { "profile.friends.nickname": "park" }));
        assert!(!matches(&stored, &doc! { "profile.friendsName": "park" }));
    }

    #[test]
    fn logical_operators() {
        let stored = doc! { "a": 1, "b": 2 };
        assert!(matches(&stored, &doc! { "$or": [{ "a": 9 }, { "b": 2 }] }));
        assert!(!matches(&stored, &doc! { "$and": [{ "a": 1 }, { "b": 9 }] }));
    }

    #[test]
    fn set_path_creates_nested_documents() {
        let mut stored = doc! { "a": 1 };
        set_path(&mut stored, "profile.thumbnail", Bson::String("t".into()));
        assert_eq!(stored, doc! { "a": 1, "profile": { "thumbnail": "t" } });
    }
}
