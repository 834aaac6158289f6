//! The four-agent stock analysis crew
//!
//! A researcher, a technical analyst and a financial analyst each produce a
//! report; a hedge fund manager reads all three and writes the
//! recommendation, which is also saved to the configured output file.

use crate::api::YahooFinanceClient;
use crate::config::StockConfig;
use crate::error::Result;
use crate::tools::stock_tools;
use crew_core::{Agent, CrewOutput, RunInputs, Task};
use crew_llm::{LLMProvider, ModelClient};
use crew_runtime::ExecutorConfig;
use crew_tools::ToolRegistry;
use crew_workflow::Crew;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Reply sent when a run fails
pub const APOLOGY: &str =
    "Sorry, I couldn't complete the analysis right now. Please try again later.";

/// Input variable carrying the user's text into every task
pub const COMPANY: &str = "company";

/// A configured crew, shared by the front-ends
#[derive(Debug)]
pub struct StockCrew {
    crew: Crew,
}

impl StockCrew {
    /// Build the crew with the live Yahoo Finance tools
    pub fn new(config: &StockConfig, provider: Arc<dyn LLMProvider>) -> Result<Self> {
        let yahoo = Arc::new(YahooFinanceClient::new(config.tool_timeout)?);
        let tools = Arc::new(stock_tools(yahoo, config.tool_timeout));
        Self::with_tools(config, provider, tools)
    }

    /// Build the crew against an arbitrary tool registry
    pub fn with_tools(
        config: &StockConfig,
        provider: Arc<dyn LLMProvider>,
        tools: Arc<ToolRegistry>,
    ) -> Result<Self> {
        let client = Arc::new(ModelClient::new(provider, config.model_settings()));
        let crew = Crew::builder(client)
            .tasks(stock_tasks(config)?)
            .tools(tools)
            .executor_config(ExecutorConfig::default().with_tool_protocol(config.tool_protocol()))
            .build()?;

        info!(
            model = %config.model,
            output_file = %config.output_file.display(),
            "Stock crew ready"
        );
        Ok(Self { crew })
    }

    pub fn crew(&self) -> &Crew {
        &self.crew
    }

    /// Run every task for `company` and return all task outputs
    pub async fn analyze(&self, company: &str) -> crew_core::Result<CrewOutput> {
        self.crew
            .kickoff(&RunInputs::new().with(COMPANY, company))
            .await
    }

    /// Answer one chat message
    ///
    /// The text is passed to the crew verbatim. Failures are logged and
    /// replaced by [`APOLOGY`] so internal errors never reach the user.
    #[instrument(skip(self, text), fields(len = text.len()))]
    pub async fn handle(&self, text: &str) -> String {
        match self.analyze(text).await {
            Ok(output) => {
                if output.is_degraded() {
                    warn!("Returning a recommendation built from incomplete reports");
                }
                output.into_raw()
            }
            Err(e) => {
                error!(error = %e, "Stock analysis failed");
                APOLOGY.to_string()
            }
        }
    }
}

fn stock_tasks(config: &StockConfig) -> Result<Vec<Task>> {
    let agent = |builder: crew_core::AgentBuilder| -> Result<Arc<Agent>> {
        Ok(Arc::new(
            builder
                .max_iterations(config.max_iterations)
                .allow_delegation(config.allow_delegation)
                .build()?,
        ))
    };

    let researcher = agent(
        Agent::builder("Researcher")
            .goal(
                "Gather and interpret vast amounts of data to provide a comprehensive overview of \
                 the sentiment and news surrounding a stock.",
            )
            .backstory(
                "You're skilled in gathering and interpreting data from various sources. You read \
                 each data source carefully and extract the most important information. Your \
                 insights are crucial for making informed investment decisions.",
            )
            .tools(["Read website content", "Stock News"]),
    )?;

    let technical_analyst = agent(
        Agent::builder("Technical Analyst")
            .goal(
                "Analyze the movements of a stock and provide insights on trends, entry points, \
                 resistance and support levels.",
            )
            .backstory(
                "An expert in technical analysis, you're known for your ability to predict stock \
                 prices. You provide valuable insights to your customers.",
            )
            .tool("Stock Price"),
    )?;

    let financial_analyst = agent(
        Agent::builder("Financial Analyst")
            .goal(
                "Use financial statements, insider trading data and other metrics to evaluate a \
                 stock's financial health and performance.",
            )
            .backstory(
                "You're a very experienced investment advisor that looks at a company's financial \
                 health, market sentiment, and qualitative data to make informed recommendations.",
            )
            .tools(["Income statement", "Balance Sheet", "Insider Transactions"]),
    )?;

    let hedge_fund_manager = agent(
        Agent::builder("Hedge Fund Manager")
            .goal(
                "Manage a portfolio of stocks and make investment decisions to maximize returns \
                 using insights from financial analysts and researchers.",
            )
            .backstory(
                "You're a seasoned hedge fund manager with a proven track record of making \
                 profitable investments. You always impress your clients.",
            ),
    )?;

    Ok(vec![
        Task::builder("research")
            .description(
                "Gather and analyze the latest news and market sentiment surrounding {company}'s \
                 stock. Provide a summary of the news and any notable shifts in sentiment.",
            )
            .expected_output(
                "Your final answer MUST be a detailed summary of the news and market sentiment \
                 surrounding the stock.",
            )
            .agent(researcher)
            .build()?,
        Task::builder("technical_analysis")
            .description(
                "Conduct a technical analysis of the {company} stock price movements and identify \
                 key support and resistance levels chart patterns.",
            )
            .expected_output(
                "Your final answer MUST be a report with potential entry points, price targets and \
                 any other relevant information.",
            )
            .agent(technical_analyst)
            .build()?,
        Task::builder("financial_analysis")
            .description(
                "Analyze the {company}'s financial statements, balance sheet, insider trading data \
                 and other metrics to evaluate {company}'s financial health and performance.",
            )
            .expected_output(
                "Your final answer MUST be a report with an overview of {company}'s revenue, \
                 earnings, cash flow, and other key financial metrics.",
            )
            .agent(financial_analyst)
            .build()?,
        Task::builder("investment_recommendation")
            .description(
                "Based on the research, technical analysis, and financial analysis reports, \
                 provide a detailed investment recommendation for {company} stock.",
            )
            .expected_output(
                "Your final answer MUST be a detailed recommendation to BUY, SELL or HOLD the \
                 stock. Provide a detailed rationale for your recommendation.",
            )
            .agent(hedge_fund_manager)
            .context(["research", "technical_analysis", "financial_analysis"])
            .output_file(config.output_file.clone())
            .build()?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crew_llm::Message;
    use crew_runtime::testing::ScriptedProvider;
    use crew_runtime::{ASK_QUESTION, DELEGATE_WORK};

    fn config() -> StockConfig {
        StockConfig::builder()
            .max_iterations(5)
            .output_file("reports/recommendation.md")
            .build()
            .unwrap()
    }

    #[test]
    fn test_task_order_and_dependencies() {
        let tasks = stock_tasks(&config()).unwrap();
        let names: Vec<_> = tasks.iter().map(|t| t.name()).collect();
        assert_eq!(
            names,
            ["research", "technical_analysis", "financial_analysis", "investment_recommendation"]
        );

        let recommendation = &tasks[3];
        assert_eq!(
            recommendation.context(),
            ["research", "technical_analysis", "financial_analysis"]
        );
        assert_eq!(
            recommendation.output_file().unwrap(),
            std::path::Path::new("reports/recommendation.md")
        );
        assert!(tasks[..3].iter().all(|t| t.output_file().is_none()));
    }

    #[test]
    fn test_agents_follow_config() {
        let tasks = stock_tasks(&config()).unwrap();
        assert!(tasks.iter().all(|t| t.agent().max_iterations() == 5));
        assert_eq!(
            tasks[0].agent().tools(),
            ["Read website content", "Stock News"]
        );
        assert_eq!(
            tasks[2].agent().tools(),
            ["Income statement", "Balance Sheet", "Insider Transactions"]
        );
        assert!(tasks[3].agent().tools().is_empty());
    }

    #[test]
    fn test_delegation_follows_config() {
        let provider = ScriptedProvider::repeating(Message::assistant("Final Answer: HOLD"));
        let crew = StockCrew::new(&config(), provider.clone()).unwrap();
        for role in ["Researcher", "Technical Analyst", "Financial Analyst", "Hedge Fund Manager"] {
            let names = crew.crew().toolset(role).unwrap().names();
            assert!(names.iter().any(|n| n == DELEGATE_WORK), "{role}: {names:?}");
            assert!(names.iter().any(|n| n == ASK_QUESTION), "{role}: {names:?}");
        }

        let solo = StockConfig::builder().allow_delegation(false).build().unwrap();
        let crew = StockCrew::new(&solo, provider).unwrap();
        assert_eq!(crew.crew().toolset("Technical Analyst").unwrap().names(), ["Stock Price"]);
    }

    #[test]
    fn test_crew_resolves_live_tools() {
        let provider = ScriptedProvider::repeating(Message::assistant("Final Answer: HOLD"));
        let crew = StockCrew::new(&config(), provider).unwrap();
        assert_eq!(crew.crew().tasks().len(), 4);
        assert_eq!(
            crew.crew().toolset("Financial Analyst").unwrap().names()[..3],
            ["Income statement", "Balance Sheet", "Insider Transactions"]
        );
    }
}
