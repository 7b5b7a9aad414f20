use ulid::Ulid;

/// 새 기본 키(ULID 문자열)를 생성합니다.
pub fn new_id() -> String {
    Ulid::new().to_string()
}
