use common::errors::AppError;
use common::index_trait::MongoIndexModelProvider;
use mongodb::{Collection, Database, IndexModel};

/// 按名称补建缺失的索引，已存在的索引不会重复创建
pub async fn index_create<T: Send + Sync>(coll: &Collection<T>, target_list: Vec<IndexModel>) -> Result<usize, AppError> {
    // 集合尚不存在时 list_indexes 会失败，视为没有任何索引
    let existing = match coll.list_index_names().await {
        Ok(names) => names,
        Err(e) => {
            log::warn!("list indexes of {} failed, assuming none: {}", coll.name(), e);
            vec![]
        }
    };

    let missing = missing_indexes(&existing, target_list);
    let created = missing.len();
    for target in missing {
        let keys = target.keys.to_string();
        match coll.create_index(target).await {
            Ok(_) => log::info!("✅ 创建索引成功: {}.{}", coll.name(), keys),
            Err(e) => {
                log::error!("❌ 创建索引失败: {}.{} {:?}", coll.name(), keys, e);
                return Err(e.into());
            }
        }
    }
    Ok(created)
}

/// 为实体声明的所有索引建索引
pub async fn ensure_indexes<T: MongoIndexModelProvider + Send + Sync>(db: &Database, collection_name: &str) -> Result<usize, AppError> {
    let coll = db.collection::<T>(collection_name);
    index_create(&coll, T::index_models()).await
}

fn missing_indexes(existing: &[String], target_list: Vec<IndexModel>) -> Vec<IndexModel> {
    target_list
        .into_iter()
        .filter(|target| {
            let name = target.options.as_ref().and_then(|o| o.name.as_ref());
            !matches!(name, Some(name) if existing.contains(name))
        })
        .collect()
}
