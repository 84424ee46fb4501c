//! Prompt sent to every provider

/// Instructions for generating exactly one AWS certification question
///
/// The shape described here is what [`super::QuizQuestion::validate`] checks.
pub const QUIZ_PROMPT: &str = "You are an AWS instructor preparing students for AWS certification exams \
(Cloud Practitioner, Solutions Architect Associate, Developer Associate, SysOps Administrator). \
Write exactly ONE realistic multiple-choice exam question about an AWS service, feature, \
pricing model or best practice.

Respond with a single raw JSON object and nothing else: no markdown, no code fences, \
no commentary before or after the object.

The JSON object must have exactly these fields:
- \"question\": the question text (string)
- \"options\": an array of either 4 or 5 distinct answer options (strings)
- \"answer\": if there are 4 options, a single string that is exactly equal to the one correct option; \
if there are 5 options, an array of exactly 2 strings, each exactly equal to one of the two correct options

Example with 4 options:
{\"question\": \"Which AWS service provides object storage?\", \"options\": [\"Amazon S3\", \"Amazon EC2\", \"Amazon RDS\", \"AWS Lambda\"], \"answer\": \"Amazon S3\"}

Example with 5 options:
{\"question\": \"Which TWO services are serverless compute options?\", \"options\": [\"AWS Lambda\", \"Amazon EC2\", \"AWS Fargate\", \"Amazon EBS\", \"Amazon VPC\"], \"answer\": [\"AWS Lambda\", \"AWS Fargate\"]}";
