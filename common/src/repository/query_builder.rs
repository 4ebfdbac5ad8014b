use mongodb::bson::{doc, Bson, Document};

/// 查询条件构造器
///
/// `and()` / `or()` 结束当前子句并决定子句之间的逻辑关系：
/// `QueryBuilder::new().eq("a", 1).or().eq("b", 2).build()` 得到 `{ "$or": [{a: 1}, {b: 2}] }`。
#[derive(Debug, Default, Clone)]
pub struct QueryBuilder {
    clauses: Vec<Document>,
    current: Document,
    logic_op: Option<&'static str>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &str, value: impl Into<Bson>) -> Self {
        self.current.insert(field, value.into());
        self
    }

    pub fn and(self) -> Self {
        self.push_clause("$and")
    }

    pub fn or(self) -> Self {
        self.push_clause("$or")
    }

    /// 空子句不入列；切换到另一种逻辑运算时，已有子句先按原运算合并成一个子句
    fn push_clause(mut self, op: &'static str) -> Self {
        let current = std::mem::take(&mut self.current);
        if !current.is_empty() {
            self.clauses.push(current);
        }
        if let Some(prev) = self.logic_op {
            if prev != op && self.clauses.len() > 1 {
                let merged = std::mem::take(&mut self.clauses);
                self.clauses.push(doc! { prev: merged });
            }
        }
        self.logic_op = Some(op);
        self
    }

    pub fn build(mut self) -> Document {
        if !self.current.is_empty() {
            self.clauses.push(self.current);
        }
        match (self.logic_op, self.clauses.len()) {
            (_, 0) => doc! {},
            (_, 1) => self.clauses.remove(0),
            (Some(op), _) => doc! { op: self.clauses },
            (None, _) => doc! {},
        }
    }
}
