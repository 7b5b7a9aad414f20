use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{ColumnTrait, Condition};

/// LIKE 패턴의 이스케이프 문자
pub const LIKE_ESCAPE: char = '\\';

/// `%`, `_`, `\`를 이스케이프하여 사용자 입력이 와일드카드로 해석되지 않게 합니다.
pub fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(ch);
    }
    escaped
}

/// 소문자로 맞춘 부분 일치 패턴 (`%keyword%`)
pub fn contains_pattern(keyword: &str) -> String {
    format!("%{}%", escape_like(&keyword.to_lowercase()))
}

/// 여러 텍스트 컬럼 중 하나라도 키워드를 포함하면 일치 (대소문자 무시)
pub fn text_match<C>(columns: &[C], keyword: &str) -> Condition
where
    C: ColumnTrait,
{
    let pattern = contains_pattern(keyword);

    columns.iter().fold(Condition::any(), |cond, column| {
        cond.add(
            Expr::expr(Func::lower(Expr::col((column.entity_name(), *column))))
                .like(LikeExpr::new(pattern.clone()).escape(LIKE_ESCAPE)),
        )
    })
}
