//! Substring search patterns for `LIKE`.

use sea_orm::sea_query::LikeExpr;

const ESCAPE: char = '\\';

/// `%keyword%` over the lower-cased keyword. `%`, `_` and `\` in the keyword
/// match themselves.
pub fn contains_pattern(keyword: &str) -> LikeExpr {
    LikeExpr::new(format!("%{}%", escape_like(&keyword.to_lowercase()))).escape(ESCAPE)
}

fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | ESCAPE) {
            out.push(ESCAPE);
        }
        out.push(c);
    }
    out
}
