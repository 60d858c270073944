use crate::error::{BotError, BotResult};

use minijinja::{Environment, Value};
use once_cell::sync::Lazy;
use strum::{EnumIter, IntoEnumIterator};
use tracing::info;

static TEMPLATES_ENVIRONMENT: Lazy<Result<Environment<'static>, minijinja::Error>> =
    Lazy::new(|| {
        info!("Initializing templating engine environment.");
        let mut env = Environment::new();

        // Use strum to iterate over the variants of the enum.
        for template in MessageTemplate::iter() {
            env.add_template(template.name(), template.template())?;
        }

        info!("Templates loaded in templating engine environment.");
        Ok(env)
    });

#[derive(Debug, Clone, Copy, EnumIter)]
pub enum MessageTemplate {
    LiveScore,
    MatchResult,
    FullScorecard,
    LiveBatting,
    LiveBowling,
    BestBatter,
    BestBowler,
}

impl MessageTemplate {
    pub fn name(&self) -> &'static str {
        match self {
            MessageTemplate::LiveScore => "live_score.txt",
            MessageTemplate::MatchResult => "match_result.txt",
            MessageTemplate::FullScorecard => "full_scorecard.txt",
            MessageTemplate::LiveBatting => "live_batting.txt",
            MessageTemplate::LiveBowling => "live_bowling.txt",
            MessageTemplate::BestBatter => "best_batter.txt",
            MessageTemplate::BestBowler => "best_bowler.txt",
        }
    }

    pub fn render(&self, ctx: Value) -> BotResult<String> {
        let env = TEMPLATES_ENVIRONMENT
            .as_ref()
            .map_err(|e| BotError::Template(e.to_string()))?;
        Ok(env.get_template(self.name())?.render(ctx)?)
    }

    pub fn template(&self) -> &'static str {
        // Bodies are Slack mrkdwn: *bold*, one line per row.
        // Loops emit their own trailing newline, so no whitespace control is used.
        match self {
            MessageTemplate::LiveScore => {
                "*{{ team }} {{ score }}/{{ wickets }}*\n\
                 Overs: {{ overs }}\n\
                 \n\
                 {{ status }}"
            }
            MessageTemplate::MatchResult => {
                "{% for inn in innings %}*{{ inn.team }}* {{ inn.score }}/{{ inn.wickets }} ({{ inn.overs }} ov)\n\
                 {% else %}Final scores unavailable\n\
                 {% endfor %}\n\
                 🏆 *Result:* {{ result }}\n\
                 🎖 *Player of the Match:* {{ player }}"
            }
            MessageTemplate::FullScorecard => {
                "{% for inn in innings %}🏏 *{{ inn.team }}*\n\
                 {% for b in inn.batters %}{{ b.name }} {{ b.runs }} ({{ b.balls }})\n\
                 {% endfor %}\n\
                 {% endfor %}"
            }
            MessageTemplate::LiveBatting => {
                "{% for b in batters %}*{{ b.name }}* {{ b.runs }} ({{ b.balls }})\n\
                 {% endfor %}"
            }
            MessageTemplate::LiveBowling => {
                "*{{ name }}*\n\
                 Overs: {{ overs }}\n\
                 Runs: {{ runs }}\n\
                 Wickets: {{ wickets }}"
            }
            MessageTemplate::BestBatter => {
                "🥇 *Best Batter ({{ team }})*\n\
                 {{ name }} – {{ runs }} ({{ balls }})"
            }
            MessageTemplate::BestBowler => {
                "🥇 *Best Bowler ({{ team }})*\n\
                 {{ name }} – {{ wickets }}/{{ runs }} ({{ overs }} ov)"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn all_templates_load() {
        for template in MessageTemplate::iter() {
            assert!(
                template.render(context! {}).is_ok(),
                "{} failed to render",
                template.name()
            );
        }
    }

    #[test]
    fn loops_do_not_leak_indentation() {
        let body = MessageTemplate::LiveBatting
            .render(context! {
                batters => vec![
                    context! { name => "Kohli", runs => 54, balls => 40 },
                    context! { name => "Rahul", runs => 12, balls => 9 },
                ]
            })
            .unwrap();
        assert_eq!(body, "*Kohli* 54 (40)\n*Rahul* 12 (9)\n");
    }
}
