//! 词形展开
//!
//! 将卡片正面的原始文本展开为按优先级排列的候选查询词：
//! 1. 原文
//! 2. 去除标点后的形式
//! 3. 去除冠词后的形式（需配置冠词列表）

use regex::Regex;
use std::sync::LazyLock;

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

static HTML_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z][a-zA-Z0-9]{1,31});").unwrap());

/// 查询时去除的标点
#[inline]
fn is_stripped_punctuation(ch: char) -> bool {
    matches!(ch, '.' | ',' | '!' | '?' | ';' | ':')
}

/// 省略冠词（如法语 `l'`、意大利语 `dell'`）以撇号结尾，按 token 前缀匹配
#[inline]
fn is_elided(article: &str) -> bool {
    article.ends_with('\'') || article.ends_with('\u{2019}')
}

/// 命名实体，未列出的保持原样
fn named_entity(name: &str) -> Option<char> {
    let ch = match name {
        "nbsp" => ' ',
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "rsquo" => '\u{2019}',
        "lsquo" => '\u{2018}',
        "laquo" => '\u{ab}',
        "raquo" => '\u{bb}',
        "iexcl" => '\u{a1}',
        "iquest" => '\u{bf}',
        "szlig" => '\u{df}',
        "ccedil" => '\u{e7}',
        "Ccedil" => '\u{c7}',
        "ntilde" => '\u{f1}',
        "Ntilde" => '\u{d1}',
        "aacute" => '\u{e1}',
        "eacute" => '\u{e9}',
        "iacute" => '\u{ed}',
        "oacute" => '\u{f3}',
        "uacute" => '\u{fa}',
        "Aacute" => '\u{c1}',
        "Eacute" => '\u{c9}',
        "Iacute" => '\u{cd}',
        "Oacute" => '\u{d3}',
        "Uacute" => '\u{da}',
        "agrave" => '\u{e0}',
        "egrave" => '\u{e8}',
        "igrave" => '\u{ec}',
        "ograve" => '\u{f2}',
        "ugrave" => '\u{f9}',
        "acirc" => '\u{e2}',
        "ecirc" => '\u{ea}',
        "icirc" => '\u{ee}',
        "ocirc" => '\u{f4}',
        "ucirc" => '\u{fb}',
        "auml" => '\u{e4}',
        "euml" => '\u{eb}',
        "iuml" => '\u{ef}',
        "ouml" => '\u{f6}',
        "uuml" => '\u{fc}',
        "Auml" => '\u{c4}',
        "Ouml" => '\u{d6}',
        "Uuml" => '\u{dc}',
        "atilde" => '\u{e3}',
        "otilde" => '\u{f5}',
        "aring" => '\u{e5}',
        "oslash" => '\u{f8}',
        "aelig" => '\u{e6}',
        "oelig" => '\u{153}',
        _ => return None,
    };
    Some(ch)
}

/// 解码单个实体引用（不含 `&` 和 `;`）
fn decode_entity(entity: &str) -> Option<char> {
    match entity.strip_prefix('#') {
        Some(numeric) => {
            let code = match numeric.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => numeric.parse().ok()?,
            };
            char::from_u32(code)
        }
        None => named_entity(entity),
    }
}

/// 去除 HTML 标签并解码实体
///
/// Anki 导出的字段可能带有 `<b>`、`<br>`、`&nbsp;`、`&#233;` 等标记，查询前需要还原为纯文本。
/// 实体只解码一遍，`&amp;lt;` 得到 `&lt;`。
pub fn strip_html(text: &str) -> String {
    let without_tags = HTML_TAG.replace_all(text, "");
    let decoded = HTML_ENTITY.replace_all(&without_tags, |caps: &regex::Captures| {
        match decode_entity(&caps[1]) {
            Some(ch) => ch.to_string(),
            None => caps[0].to_string(),
        }
    });
    decoded.trim().to_string()
}

/// 去除标点并裁剪首尾空白
pub fn strip_punctuation(word: &str) -> String {
    word.chars()
        .filter(|ch| !is_stripped_punctuation(*ch))
        .collect::<String>()
        .trim()
        .to_string()
}

/// 去除第一个匹配的冠词
///
/// 冠词按整词、大小写不敏感匹配；只移除一次出现。没有匹配时返回 `None`。
pub fn strip_article(word: &str, articles: &[String]) -> Option<String> {
    let articles: Vec<String> = articles
        .iter()
        .map(|a| a.trim().to_lowercase())
        .filter(|a| !a.is_empty())
        .collect();
    if articles.is_empty() {
        return None;
    }

    let tokens: Vec<&str> = word.split_whitespace().collect();
    for (i, token) in tokens.iter().enumerate() {
        let lowered = token.to_lowercase();

        if articles.iter().any(|a| !is_elided(a) && *a == lowered) {
            let rest: Vec<&str> = tokens
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, t)| *t)
                .collect();
            return Some(rest.join(" "));
        }

        if let Some(article) = articles
            .iter()
            .filter(|a| is_elided(a))
            .find(|a| lowered.starts_with(a.as_str()) && lowered.len() > a.len())
        {
            // 小写化可能改变字节长度，按字符数截取
            let skip = article.chars().count();
            let remainder: String = token.chars().skip(skip).collect();
            let mut rest: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
            rest[i] = remainder;
            return Some(rest.join(" "));
        }
    }

    None
}

/// 将原始词展开为候选查询词
///
/// 原文总是排在第一位；结果中不会出现重复项，也不会出现空字符串
/// （原文本身除外）。
pub fn expand(word: &str, articles: &[String]) -> Vec<String> {
    let mut candidates = vec![word.to_string()];
    let mut push = |candidate: String| {
        if !candidate.is_empty() && !candidates.contains(&candidate) {
            candidates.push(candidate);
        }
    };

    let clean = strip_punctuation(word);
    push(clean.clone());

    if let Some(without_article) = strip_article(&clean, articles) {
        push(without_article.trim().to_string());
    }

    candidates
}
