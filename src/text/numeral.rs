//! 章节序号解析
//!
//! 把“第X章/卷”中的 X 转换为数字。X 可以是中文数字（一、十二、一百零五、两千）
//! 也可以是半角或全角阿拉伯数字。

fn fullwidth_digit(c: char) -> Option<u32> {
    match c {
        '０'..='９' => Some(c as u32 - '０' as u32),
        _ => None,
    }
}

fn cjk_digit(c: char) -> Option<u64> {
    let value = match c {
        '零' | '〇' => 0,
        '一' => 1,
        '二' | '两' => 2,
        '三' => 3,
        '四' => 4,
        '五' => 5,
        '六' => 6,
        '七' => 7,
        '八' => 8,
        '九' => 9,
        _ => return None,
    };
    Some(value)
}

fn cjk_unit(c: char) -> Option<u64> {
    match c {
        '十' => Some(10),
        '百' => Some(100),
        '千' => Some(1_000),
        '万' => Some(10_000),
        _ => None,
    }
}

/// 解析章节序号
///
/// # 参数
/// * `text` - 序号文本，例如 `12`、`１２`、`十二`、`一百零五`
///
/// # 返回值
/// * `Option<u32>` - 无法解析或超出范围时返回 `None`
pub fn parse_numeral(text: &str) -> Option<u32> {
    if text.is_empty() {
        return None;
    }

    if text.chars().all(|c| c.is_ascii_digit() || fullwidth_digit(c).is_some()) {
        return text.chars().try_fold(0u32, |acc, c| {
            let digit = c.to_digit(10).or_else(|| fullwidth_digit(c))?;
            acc.checked_mul(10)?.checked_add(digit)
        });
    }

    // 不带单位的中文数字按位读，例如“一二三”或“二〇二四”
    if text.chars().all(|c| cjk_digit(c).is_some()) {
        let value = text
            .chars()
            .try_fold(0u64, |acc, c| acc.checked_mul(10)?.checked_add(cjk_digit(c)?))?;
        return u32::try_from(value).ok();
    }

    parse_cjk_with_units(text)
}

fn parse_cjk_with_units(text: &str) -> Option<u32> {
    let mut total: u64 = 0;
    let mut section: u64 = 0;
    let mut digit: Option<u64> = None;

    for c in text.chars() {
        if let Some(d) = cjk_digit(c) {
            digit = Some(d);
        } else if let Some(unit) = cjk_unit(c) {
            if unit == 10_000 {
                section += digit.take().unwrap_or(0);
                total += section.max(1) * unit;
                section = 0;
            } else {
                // “十二”中省略了开头的“一”
                section += digit.take().unwrap_or(1) * unit;
            }
        } else {
            return None;
        }
    }

    let value = total + section + digit.unwrap_or(0);
    u32::try_from(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_digits() {
        assert_eq!(parse_numeral("1"), Some(1));
        assert_eq!(parse_numeral("0128"), Some(128));
    }

    #[test]
    fn test_fullwidth_digits() {
        assert_eq!(parse_numeral("１２"), Some(12));
    }

    #[test]
    fn test_cjk_numerals() {
        assert_eq!(parse_numeral("一"), Some(1));
        assert_eq!(parse_numeral("十"), Some(10));
        assert_eq!(parse_numeral("十二"), Some(12));
        assert_eq!(parse_numeral("二十"), Some(20));
        assert_eq!(parse_numeral("一百零五"), Some(105));
        assert_eq!(parse_numeral("两千三百四十五"), Some(2345));
        assert_eq!(parse_numeral("一万零一"), Some(10001));
    }

    #[test]
    fn test_positional_cjk_digits() {
        assert_eq!(parse_numeral("二〇二四"), Some(2024));
    }

    #[test]
    fn test_invalid_numerals() {
        assert_eq!(parse_numeral(""), None);
        assert_eq!(parse_numeral("十a"), None);
        assert_eq!(parse_numeral("99999999999"), None);
    }
}
