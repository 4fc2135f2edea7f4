//! The part of CSS the text layout engine honours.
//!
//! Rules are matched on type, class and `type.class` selectors; anything with combinators,
//! pseudo-classes or attribute tests is ignored, as are at-rules. Only `display: none`,
//! `font-size` and `font-weight` have an effect. Later rules win over earlier ones
//! regardless of specificity.

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_until, take_while1},
    character::complete::{char, digit0, digit1, multispace0},
    combinator::{all_consuming, map_res, opt, recognize, value},
    multi::many0,
    sequence::{delimited, pair, preceded, terminated},
};

/// A font size as written: absolute points, or a factor of the inherited size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum FontSize {
    Points(f32),
    Scale(f32),
}

/// Declarations the layout engine understands; `None` leaves the inherited value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Declarations {
    pub(crate) hidden: Option<bool>,
    pub(crate) font_size: Option<FontSize>,
    pub(crate) bold: Option<bool>,
}

impl Declarations {
    fn merge(&mut self, other: &Declarations) {
        self.hidden = other.hidden.or(self.hidden);
        self.font_size = other.font_size.or(self.font_size);
        self.bold = other.bold.or(self.bold);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Selector {
    element: Option<String>,
    classes: Vec<String>,
}

impl Selector {
    fn matches(&self, element: &str, classes: &[String]) -> bool {
        self.element.as_deref().is_none_or(|name| name == element)
            && self.classes.iter().all(|class| classes.contains(class))
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Rule {
    selectors: Vec<Selector>,
    declarations: Declarations,
}

/// Rules collected from every `<style>` element seen so far.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct StyleRules {
    rules: Vec<Rule>,
}

impl StyleRules {
    /// Append the supported rules from `css`.
    pub(crate) fn extend(&mut self, css: &str) {
        let css = strip_comments(css);
        let mut rest = css.as_str();

        while let Ok((next, (prelude, body))) = rule(rest) {
            rest = next;

            let selectors: Vec<Selector> = prelude.split(',').filter_map(selector).collect();

            if !selectors.is_empty() {
                self.rules.push(Rule {
                    selectors,
                    declarations: declarations(body),
                });
            }
        }
    }

    /// Declarations of every rule matching `element` with `classes`, in source order.
    pub(crate) fn cascade(&self, element: &str, classes: &[String]) -> Declarations {
        let mut declared = Declarations::default();

        for rule in &self.rules {
            if rule
                .selectors
                .iter()
                .any(|selector| selector.matches(element, classes))
            {
                declared.merge(&rule.declarations);
            }
        }

        declared
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.rules.len()
    }
}

fn comment(input: &str) -> IResult<&str, &str> {
    delimited(tag("/*"), take_until("*/"), tag("*/"))(input)
}

fn text_before_comment(input: &str) -> IResult<&str, &str> {
    terminated(take_until("/*"), comment)(input)
}

fn strip_comments(css: &str) -> String {
    let mut stripped = String::with_capacity(css.len());
    let mut rest = css;

    while let Ok((next, text)) = text_before_comment(rest) {
        stripped.push_str(text);
        stripped.push(' ');
        rest = next;
    }

    stripped.push_str(rest);
    stripped
}

/// `prelude { body }`, with surrounding whitespace.
fn rule(input: &str) -> IResult<&str, (&str, &str)> {
    preceded(
        multispace0,
        pair(
            terminated(take_until("{"), char('{')),
            terminated(take_until("}"), char('}')),
        ),
    )(input)
}

fn ident(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_')(input)
}

fn compound_selector(input: &str) -> IResult<&str, (Option<&str>, Vec<&str>)> {
    pair(
        opt(alt((ident, tag("*")))),
        many0(preceded(char('.'), ident)),
    )(input)
}

fn selector(text: &str) -> Option<Selector> {
    let (_, (element, classes)) = all_consuming(compound_selector)(text.trim()).ok()?;

    if element.is_none() && classes.is_empty() {
        return None;
    }

    Some(Selector {
        element: element
            .filter(|name| *name != "*")
            .map(str::to_ascii_lowercase),
        classes: classes.into_iter().map(str::to_string).collect(),
    })
}

fn property(input: &str) -> IResult<&str, &str> {
    terminated(delimited(multispace0, ident, multispace0), char(':'))(input)
}

fn declarations(body: &str) -> Declarations {
    let mut declared = Declarations::default();

    for declaration in body.split(';') {
        let Ok((value, name)) = property(declaration) else {
            continue;
        };

        let value = value.trim();
        let value = value.strip_suffix("!important").unwrap_or(value).trim();

        match name.to_ascii_lowercase().as_str() {
            "display" => declared.hidden = Some(value.eq_ignore_ascii_case("none")),
            "font-size" => {
                if let Ok((_, size)) = all_consuming(font_size)(value) {
                    declared.font_size = Some(size);
                }
            }
            "font-weight" => {
                if let Some(bold) = font_weight(value) {
                    declared.bold = Some(bold);
                }
            }
            _ => {}
        }
    }

    declared
}

fn number(input: &str) -> IResult<&str, f32> {
    map_res(
        recognize(pair(digit0, opt(pair(char('.'), digit1)))),
        |digits: &str| digits.parse::<f32>(),
    )(input)
}

/// `pt` and `px` are absolute; `em`, `rem` and `%` scale the inherited size.
fn font_size(input: &str) -> IResult<&str, FontSize> {
    let (input, amount) = number(input)?;

    alt((
        value(FontSize::Points(amount), tag_no_case("pt")),
        value(FontSize::Points(amount * 0.75), tag_no_case("px")),
        value(FontSize::Scale(amount), tag_no_case("rem")),
        value(FontSize::Scale(amount), tag_no_case("em")),
        value(FontSize::Scale(amount / 100.0), char('%')),
    ))(input)
}

fn font_weight(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "bold" | "bolder" => Some(true),
        "normal" | "lighter" => Some(false),
        other => other.parse::<u16>().ok().map(|weight| weight >= 600),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| (*name).to_string()).collect()
    }

    #[test]
    fn supported_properties_are_read() {
        let mut rules = StyleRules::default();
        rules.extend("h1 { display: none; } body { font-size: 40pt; } .status { font-weight: 700 }");

        assert_eq!(rules.cascade("h1", &[]).hidden, Some(true));
        assert_eq!(
            rules.cascade("body", &[]).font_size,
            Some(FontSize::Points(40.0))
        );
        assert_eq!(rules.cascade("p", &classes(&["status"])).bold, Some(true));
        assert_eq!(rules.cascade("p", &[]), Declarations::default());
    }

    #[test]
    fn unsupported_selectors_and_at_rules_are_skipped() {
        let mut rules = StyleRules::default();
        rules.extend(
            "@page { size: A4; }
             /* table cells */
             .items td:nth-child(3), .recipient p { font-size: 30pt; }
             p.note, td { font-size: 1.5em; color: red }",
        );

        assert_eq!(rules.len(), 1);
        assert_eq!(rules.cascade("p", &classes(&["recipient"])).font_size, None);
        assert_eq!(
            rules.cascade("p", &classes(&["note", "small"])).font_size,
            Some(FontSize::Scale(1.5))
        );
        assert_eq!(rules.cascade("p", &[]).font_size, None);
    }

    #[test]
    fn later_rules_override_earlier_ones() {
        let mut rules = StyleRules::default();
        rules.extend("p { font-size: 12px; font-weight: bold } p { font-size: 50% !important }");

        let declared = rules.cascade("p", &[]);

        assert_eq!(declared.font_size, Some(FontSize::Scale(0.5)));
        assert_eq!(declared.bold, Some(true));
    }

    #[test]
    fn px_converts_to_points_and_bad_sizes_are_ignored() {
        let mut rules = StyleRules::default();
        rules.extend("h2 { font-size: 16px } h3 { font-size: large } * { display: block }");

        assert_eq!(
            rules.cascade("h2", &[]).font_size,
            Some(FontSize::Points(12.0))
        );
        assert_eq!(rules.cascade("h3", &[]).font_size, None);
        assert_eq!(rules.cascade("section", &[]).hidden, Some(false));
    }
}
