use uuid::Uuid;

/// 生成 32 位无连字符的 UUID 字符串，用作文档 id
pub fn build_id() -> String {
    let uuid = Uuid::new_v4().simple();
    format!("{}", uuid)
}

#[cfg(test)]
mod tests {
    use super::build_id;

    #[test]
    fn ids_are_unique_hex() {
        let a = build_id();
        let b = build_id();
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
