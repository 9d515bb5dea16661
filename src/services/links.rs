//! 외부 사이트 링크 생성
//!
//! 종목 코드/이름을 고정 URL 템플릿에 끼워 넣는다.
//! 링크 대상의 가용성이나 내용은 보장하지 않는다.

use url::form_urlencoded;

/// 네이버 금융 시세 페이지
pub fn naver_price(code: &str) -> String {
    format!("https://finance.naver.com/item/main.naver?code={}", code)
}

/// FnGuide 기업 정보
pub fn fnguide(code: &str) -> String {
    format!(
        "http://comp.fnguide.com/SVO2/ASP/SVD_Main.asp?pGB=1&gicode=A{}",
        code
    )
}

/// 네이버 금융 DART 공시 목록
pub fn dart_filings(code: &str) -> String {
    format!("https://finance.naver.com/item/dart.naver?code={}", code)
}

/// 증권사 리포트 목록
pub fn research_reports(code: &str) -> String {
    format!(
        "https://finance.naver.com/research/company_list.naver?searchType=itemCode&itemCode={}",
        code
    )
}

/// 트레이딩뷰 차트
pub fn tradingview_chart(code: &str) -> String {
    format!("https://kr.tradingview.com/chart/?symbol=KRX:{}", code)
}

/// 구글 트렌드 최근 12개월 관심도
pub fn google_trends(name: &str) -> String {
    format!(
        "https://trends.google.co.kr/trends/explore?date=today%2012-m&geo=KR&q={}",
        encode(name)
    )
}

/// 삼프로TV 해설 영상 유튜브 검색
pub fn sampro_tv(name: &str) -> String {
    format!(
        "https://www.youtube.com/results?search_query={}",
        encode(&format!("삼프로TV {}", name))
    )
}

/// 구글 뉴스 주가 전망 검색
pub fn google_news(name: &str) -> String {
    format!(
        "https://www.google.com/search?q={}&tbm=nws",
        encode(&format!("{} 주가전망", name))
    )
}

fn encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
