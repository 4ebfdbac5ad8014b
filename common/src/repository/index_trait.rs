use mongodb::IndexModel;

/// 实体声明自身需要的 MongoDB 索引，通常由 `#[derive(MongoIndexModelProvider)]` 生成
pub trait MongoIndexModelProvider {
    fn index_models() -> Vec<IndexModel>;
}
