use async_trait::async_trait;
use mongodb::{bson::Document, error::Result, Collection};
use serde::{de::DeserializeOwned, Serialize};

/// 单条更新的结果：匹配条数与实际修改条数
///
/// 匹配但值未变化时 `matched = 1, modified = 0`。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateCount {
    pub matched: u64,
    pub modified: u64,
}

/// 单集合数据访问接口，每个方法对应一次数据库往返
#[async_trait]
pub trait Repository<T: Send + Sync>: Send + Sync {
    async fn insert(&self, entity: &T) -> Result<()>;
    async fn find_one(&self, filter: Document) -> Result<Option<T>>;
    /// 更新第一条匹配的文档
    async fn update_one(&self, filter: Document, update: Document) -> Result<UpdateCount>;
}

pub struct BaseRepository<T: Send + Sync> {
    pub collection: Collection<T>, // 线程安全的数据库连接池
}

impl<T: Send + Sync> BaseRepository<T> {
    pub fn new(collection: Collection<T>) -> Self {
        Self { collection }
    }
}

#[async_trait]
impl<T> Repository<T> for BaseRepository<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync,
{
    async fn insert(&self, entity: &T) -> Result<()> {
        self.collection.insert_one(entity).await?;
        Ok(())
    }

    async fn find_one(&self, filter: Document) -> Result<Option<T>> {
        let result = self.collection.find_one(filter).await?;
        Ok(result)
    }

    async fn update_one(&self, filter: Document, update: Document) -> Result<UpdateCount> {
        let result = self.collection.update_one(filter, update).await?;
        Ok(UpdateCount { matched: result.matched_count, modified: result.modified_count })
    }
}
