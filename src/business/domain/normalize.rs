//! 分组ID规整
//!
//! 分组ID集合在比较和写库前都必须规整：去重、升序、只保留正数。
//! 相等性是集合相等，与输入顺序无关。

/// 规整分组ID数组：过滤非正数、升序排序、去重
///
/// 该函数是幂等的：`normalize(normalize(x)) == normalize(x)`。
pub fn normalize_group_ids(ids: &[i64]) -> Vec<i64> {
    let mut out: Vec<i64> = ids.iter().copied().filter(|id| *id > 0).collect();
    out.sort_unstable();
    out.dedup();
    out
}

/// 集合语义下的分组ID相等判断
pub fn group_ids_equal(a: &[i64], b: &[i64]) -> bool {
    normalize_group_ids(a) == normalize_group_ids(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_sorts_and_dedups() {
        assert_eq!(normalize_group_ids(&[3, 1, 1, 2]), vec![1, 2, 3]);
        assert_eq!(normalize_group_ids(&[1, 2, 3, 3]), vec![1, 2, 3]);
    }

    #[test]
    fn test_normalize_drops_non_positive() {
        assert_eq!(normalize_group_ids(&[0, -1, 5, 2]), vec![2, 5]);
        assert_eq!(normalize_group_ids(&[-7, 0]), Vec::<i64>::new());
    }

    #[test]
    fn test_normalize_idempotent() {
        let input = vec![9, 3, 3, -2, 0, 9, 1];
        let once = normalize_group_ids(&input);
        let twice = normalize_group_ids(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_equality_is_order_insensitive() {
        assert!(group_ids_equal(&[3, 1, 1, 2], &[1, 2, 3, 3]));
        assert!(!group_ids_equal(&[1, 2], &[1, 2, 3]));
    }
}
