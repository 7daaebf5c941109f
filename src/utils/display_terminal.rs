//! 터미널 출력 포맷팅 유틸리티
//!
//! 시작 시 프로바이더 등록 과정을 박스 제목과 트리 형태로 출력합니다.

/// 박스 형태로 둘러싸인 제목을 출력합니다
///
/// ```text
/// ╔══════════════════════════════════════════════════╗
/// ║         🔄 LOADING OPENID PROVIDERS              ║
/// ╚══════════════════════════════════════════════════╝
/// ```
pub fn print_boxed_title(title: &str) {
    let border = "═".repeat(50);

    println!("╔{}╗", border);
    println!("║{:^49}║", title);
    println!("╚{}╝", border);
}

/// 하위 작업 상태를 트리 형태로 출력합니다
pub fn print_sub_task(name: &str, status: &str) {
    println!("   ├─ {}: {}", name, status);
}

/// 프로바이더 등록 요약
///
/// ```text
///    🔑 Providers loaded: 2
///    ⚠️  Providers skipped: 1
/// ```
pub fn print_registry_summary(loaded: usize, skipped: usize) {
    println!();
    print_boxed_title("🎉 PROVIDER REGISTRY INITIALIZED");
    println!("   🔑 Providers loaded: {}", loaded);
    if skipped > 0 {
        println!("   ⚠️  Providers skipped: {}", skipped);
    }
    println!();
}
