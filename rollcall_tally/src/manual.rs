/*!

This is the long-form manual for `rollcall_tally` and the `rollcall` program.

## Input formats

The program needs four tables: bills, legislators, votes (roll calls) and vote results.
The following providers are supported:
* `csv` one Comma Separated Values file per table (default)
* `xlsx` one Excel workbook with one worksheet per table

In both cases the first row is a header. Columns are found by their name in the header:
their order does not matter and extra columns are ignored.

| table          | columns                                 |
|----------------|-----------------------------------------|
| bills          | `id`, `title`, `sponsor_id`             |
| legislators    | `id`, `name`                            |
| votes          | `id`, `bill_id`                         |
| vote results   | `vote_id`, `legislator_id`, `vote_type` |

All the ids and the vote type must be integers. The vote type is `1` for a yea (support)
and `2` for a nay (opposition). Any other code stops the program: a single unknown code
means that the input does not follow the expected convention, and none of the counts
can be trusted.

### csv

The default file names are `bills.csv`, `legislators.csv`, `votes.csv` and
`vote_results.csv`, inside the `input` folder.

```text
vote_id,legislator_id,vote_type
3314,400440,1
3314,412211,2
```

### xlsx

The workbook must contain the worksheets `bills`, `legislators`, `votes` and
`vote_results`. Integer cells may be stored as numbers or as text.

## Reports

Two CSV files are written in the `output` folder:

`legislators-support-oppose-count.csv`:

```text
id,name,num_supported_bills,num_opposed_bills
400440,Rep. Don Young (R-AK-1),1,1
```

`bills.csv`:

```text
id,title,supporter_count,opposer_count,primary_sponsor
2952375,H.R. 5376: Build Back Better Act,6,13,Rep. John Yarmuth (D-KY-3)
```

A legislator only appears if they have at least one recorded position. A bill only
appears if at least one of the recorded positions refers to one of its roll calls:
positions that refer to an unknown roll call are still counted for the legislator, but
not for any bill. Legislators missing from the roster are reported as `Unknown`, and
so are sponsors.

If there is nothing to report, the file is not written, and a report of the same name
left by an earlier run is removed.

## Configuration

`rollcall` comes with defaults that match the layout above. All of them can be changed
with a configuration file in JSON:

```json
{
  "inputSettings": {
    "provider": "csv",
    "inputFolder": "input",
    "billsFile": "bills.csv",
    "legislatorsFile": "legislators.csv",
    "votesFile": "votes.csv",
    "voteResultsFile": "vote_results.csv"
  },
  "outputSettings": {
    "outputFolder": "output",
    "legislatorReportFile": "legislators-support-oppose-count.csv",
    "billReportFile": "bills.csv"
  }
}
```

All the keys are optional. For the `xlsx` provider, `workbookFile` is the name of the
workbook inside the input folder. Relative folders are interpreted from the location of
the configuration file.

The command line options `--input`, `--input-type` and `--out` take precedence over the
configuration file.

## Checking against a reference

With `--reference <folder>`, the reports are compared after they are written with the
files of the same name in the given folder. Any difference is printed and the program
fails.

 */
